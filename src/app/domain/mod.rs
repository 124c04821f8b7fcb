//! Domain layer - core data structures and types.
//!
//! This module contains the fundamental document models:
//! - Layers (containers, text nodes, component instances) and their styles
//! - Components with declared props and usage examples
//! - Design tokens (colors, font sizes, font families, breakpoints)

pub mod component;
pub mod layer;
pub mod tokens;

pub use component::{Component, ComponentExample, PropDefinition, PropType};
pub use layer::{
    Binding, BindingMap, Color, ComponentLayer, ContainerLayer, Dimensions, FlexDirection, Layer,
    LayerType, Length, Margin, MediaQuery, Padding, Ref, TextAlign, TextLayer, TextStyle, TextTag,
};
pub use tokens::{
    BreakpointDefinition, BreakpointsMap, ColorDefinition, ColorsMap, FontFamiliesMap,
    FontFamilyDefinition, FontSizeDefinition, FontSizesMap,
};
