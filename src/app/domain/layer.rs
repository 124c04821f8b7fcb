use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// A reference to a design token by id.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Ref {
    pub id: String,
}

impl Ref {
    pub fn new(id: impl Into<String>) -> Self {
        Self { id: id.into() }
    }
}

/// A fixed pixel length.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Length {
    pub value: f64,
}

/// A color: either a reference to a color token or a hex literal.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum Color {
    Ref(Ref),
    Hex(String),
}

/// Horizontal text alignment.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum TextAlign {
    #[default]
    Left,
    Center,
    Right,
    Justify,
}

/// Main-axis direction of a container.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum FlexDirection {
    Row,
    #[default]
    Column,
}

/// Semantic tag a text layer renders as.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum TextTag {
    #[default]
    P,
    H1,
    H2,
    H3,
    H4,
    H5,
    H6,
}

/// Optional size constraints shared by layer styles.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct Dimensions {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub width: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub min_width: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_width: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub height: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub min_height: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_height: Option<String>,
}

/// Optional outer spacing.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, Default)]
pub struct Margin {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub top: Option<Length>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub right: Option<Length>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub bottom: Option<Length>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub left: Option<Length>,
}

/// Optional inner spacing.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, Default)]
pub struct Padding {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub top: Option<Length>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub right: Option<Length>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub bottom: Option<Length>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub left: Option<Length>,
}

/// Style record of a text layer.
///
/// `font_size` and `font_family` always reference design tokens; colors may
/// be token references or literals. A dangling token reference is not an
/// error here — the renderer substitutes a fallback.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TextStyle {
    pub line_height: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub letter_spacing: Option<Length>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub color: Option<Color>,
    pub font_size: Ref,
    pub font_family: Ref,
    #[serde(default)]
    pub text_align: TextAlign,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub background_color: Option<Color>,
    #[serde(default)]
    pub dimensions: Dimensions,
    #[serde(default)]
    pub margin: Margin,
    #[serde(default)]
    pub padding: Padding,
}

/// A responsive style override, active when the referenced breakpoint's
/// minimum width is satisfied. Overrides apply in list order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MediaQuery<S> {
    pub id: String,
    pub min_width: Ref,
    pub style: S,
}

/// A style/content field bound to a component prop, resolved when the
/// component is rendered or exported.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Binding {
    pub prop_name: String,
}

/// Binding target field name -> bound prop.
pub type BindingMap = BTreeMap<String, Binding>;

/// A container layer: an ordered sequence of child layers.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ContainerLayer {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub flex_direction: FlexDirection,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub background_color: Option<Color>,
    #[serde(default)]
    pub dimensions: Dimensions,
    #[serde(default)]
    pub children: Vec<Layer>,
}

/// A text leaf: literal or bound text plus a style record and responsive
/// overrides.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TextLayer {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub tag: TextTag,
    pub text: String,
    pub style: TextStyle,
    #[serde(default)]
    pub media_queries: Vec<MediaQuery<TextStyle>>,
    #[serde(default)]
    pub bindings: BindingMap,
}

/// An instance of another component placed inside a layout.
///
/// `props` holds literal values for the instanced component's props;
/// `bindings` maps the instanced component's prop names onto props of the
/// enclosing component. Both maps are keyed by the instanced component's
/// prop names.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ComponentLayer {
    pub id: String,
    pub name: String,
    pub component_id: String,
    #[serde(default)]
    pub props: BTreeMap<String, String>,
    #[serde(default)]
    pub bindings: BindingMap,
}

/// A node in a component's visual tree.
///
/// A layer belongs to exactly one parent container or is a component root.
/// Parent links are never stored; traversal rebuilds them when needed
/// (`tree_ops::flatten_layer`), so trees stay acyclic by construction.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Layer {
    Container(ContainerLayer),
    Text(TextLayer),
    Component(ComponentLayer),
}

/// Layer kind discriminant, used by `AddLayer` actions and factories.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum LayerType {
    Container,
    Text,
    Component,
}

impl Layer {
    pub fn id(&self) -> &str {
        match self {
            Layer::Container(c) => &c.id,
            Layer::Text(t) => &t.id,
            Layer::Component(c) => &c.id,
        }
    }

    pub fn name(&self) -> &str {
        match self {
            Layer::Container(c) => &c.name,
            Layer::Text(t) => &t.name,
            Layer::Component(c) => &c.name,
        }
    }

    pub fn set_name(&mut self, name: impl Into<String>) {
        let name = name.into();
        match self {
            Layer::Container(c) => c.name = name,
            Layer::Text(t) => t.name = name,
            Layer::Component(c) => c.name = name,
        }
    }

    pub fn layer_type(&self) -> LayerType {
        match self {
            Layer::Container(_) => LayerType::Container,
            Layer::Text(_) => LayerType::Text,
            Layer::Component(_) => LayerType::Component,
        }
    }

    pub fn is_container(&self) -> bool {
        matches!(self, Layer::Container(_))
    }

    /// Child layers, in order. Leaves have none; component instances are
    /// leaves here (their own tree lives on the instanced component).
    pub fn children(&self) -> &[Layer] {
        match self {
            Layer::Container(c) => &c.children,
            Layer::Text(_) | Layer::Component(_) => &[],
        }
    }

    /// Pre-order visit of this layer and every descendant.
    pub fn visit<'a>(&'a self, f: &mut impl FnMut(&'a Layer)) {
        f(self);
        for child in self.children() {
            child.visit(&mut *f);
        }
    }

    /// Pre-order mutable visit of this layer and every descendant.
    pub fn visit_mut(&mut self, f: &mut impl FnMut(&mut Layer)) {
        f(self);
        if let Layer::Container(c) = self {
            for child in &mut c.children {
                child.visit_mut(&mut *f);
            }
        }
    }

    /// Ids of this layer and every descendant, in pre-order.
    pub fn subtree_ids(&self) -> Vec<&str> {
        let mut ids = Vec::new();
        self.visit(&mut |layer| ids.push(layer.id()));
        ids
    }

    /// Keep only the bindings matching the predicate. Containers carry no
    /// bindings.
    pub fn retain_bindings(&mut self, mut keep: impl FnMut(&str, &Binding) -> bool) {
        match self {
            Layer::Text(t) => t.bindings.retain(|k, v| keep(k, v)),
            Layer::Component(c) => c.bindings.retain(|k, v| keep(k, v)),
            Layer::Container(_) => {}
        }
    }
}
