//! The action processor: a pure reducer from `(Action, Project)` to the
//! next `Project`.
//!
//! No clock, randomness, or I/O — the same action applied to the same
//! state always yields the same result, which is what makes replay-based
//! undo possible. On error the input state is returned untouched and the
//! caller must not append the action to the log.

use std::collections::BTreeSet;

use crate::app::actions::Action;
use crate::app::domain::{Component, ComponentExample, Layer, LayerType, PropDefinition};
use crate::app::error::{EngineError, Result};
use crate::app::services::tree_ops::{self, InsertPosition};
use crate::app::state::Project;

/// Apply one action to the document, producing the next document.
pub fn apply_action(action: &Action, project: &Project) -> Result<Project> {
    match action {
        Action::InitProject { project } => Ok((**project).clone()),

        Action::AddComponent { component_id, name } => add_component(project, component_id, name),
        Action::RenameComponent { component_id, name } => {
            rename_component(project, component_id, name)
        }
        Action::DeleteComponent { component_id } => delete_component(project, component_id),

        Action::AddLayer {
            component_id,
            layer_type,
            layer_id,
            parent_layer_id,
            source_component_id,
        } => add_layer(
            project,
            component_id,
            *layer_type,
            layer_id,
            parent_layer_id.as_deref(),
            source_component_id.as_deref(),
        ),
        Action::RenameLayer { component_id, layer_id, name } => {
            rename_layer(project, component_id, layer_id, name)
        }
        Action::DeleteLayer { component_id, layer_id } => {
            delete_layer(project, component_id, layer_id)
        }
        Action::MoveLayer { component_id, layer_id, parent_id, position } => move_layer(
            project,
            component_id,
            layer_id,
            &InsertPosition::new(parent_id.clone(), *position),
        ),
        Action::UpdateLayer { component_id, layer } => update_layer(project, component_id, layer),
        Action::SelectLayer { layer_id } => select_layer(project, layer_id.as_deref()),

        Action::AddComponentProp { component_id, prop } => {
            add_component_prop(project, component_id, prop)
        }
        Action::EditComponentProp { component_id, old_prop, new_prop } => {
            edit_component_prop(project, component_id, old_prop, new_prop)
        }
        Action::DeleteComponentProp { component_id, prop } => {
            delete_component_prop(project, component_id, prop)
        }

        Action::AddComponentExample { component_id, name } => {
            add_component_example(project, component_id, name)
        }
        Action::DeleteComponentExample { component_id, name } => {
            delete_component_example(project, component_id, name)
        }
        Action::SetComponentExampleProp { component_id, example, prop, value } => {
            set_component_example_prop(project, component_id, example, prop, value)
        }

        Action::SetColor { id, definition } => {
            let mut next = project.clone();
            next.colors.insert(id.clone(), definition.clone());
            next.touch();
            Ok(next)
        }
        Action::DeleteColor { id } => {
            let mut next = project.clone();
            next.colors
                .remove(id)
                .ok_or_else(|| EngineError::NotFound(format!("color {id}")))?;
            next.touch();
            Ok(next)
        }
        Action::SetFontSize { id, definition } => {
            let mut next = project.clone();
            next.font_sizes.insert(id.clone(), definition.clone());
            next.touch();
            Ok(next)
        }
        Action::DeleteFontSize { id } => {
            let mut next = project.clone();
            next.font_sizes
                .remove(id)
                .ok_or_else(|| EngineError::NotFound(format!("font size {id}")))?;
            next.touch();
            Ok(next)
        }
        Action::SetFontFamily { id, definition } => {
            let mut next = project.clone();
            next.font_families.insert(id.clone(), definition.clone());
            next.touch();
            Ok(next)
        }
        Action::DeleteFontFamily { id } => {
            let mut next = project.clone();
            next.font_families
                .remove(id)
                .ok_or_else(|| EngineError::NotFound(format!("font family {id}")))?;
            next.touch();
            Ok(next)
        }
        Action::SetBreakpoint { id, definition } => {
            let mut next = project.clone();
            next.breakpoints.insert(id.clone(), definition.clone());
            next.touch();
            Ok(next)
        }
        Action::DeleteBreakpoint { id } => {
            let mut next = project.clone();
            next.breakpoints
                .remove(id)
                .ok_or_else(|| EngineError::NotFound(format!("breakpoint {id}")))?;
            next.touch();
            Ok(next)
        }
    }
}

// --- Components ---

fn add_component(project: &Project, component_id: &str, name: &str) -> Result<Project> {
    if project.components.contains_key(component_id) {
        return Err(EngineError::InvalidArgument(format!(
            "component id {component_id} already in use"
        )));
    }
    let mut next = project.clone();
    next.components.insert(component_id.to_string(), Component::new(name));
    next.touch();
    Ok(next)
}

fn rename_component(project: &Project, component_id: &str, name: &str) -> Result<Project> {
    let mut next = project.clone();
    next.component_mut(component_id)?.name = name.to_string();
    next.touch();
    Ok(next)
}

fn delete_component(project: &Project, component_id: &str) -> Result<Project> {
    project.component(component_id)?;
    if let Some(user) = instancing_component(project, component_id) {
        return Err(EngineError::InvalidArgument(format!(
            "component {component_id} is still instanced by {user}"
        )));
    }
    let mut next = project.clone();
    // Drop the selection if it pointed into the deleted layout
    let deleted_layout = next.components.get(component_id).and_then(|c| c.layout.as_ref());
    let selected_inside = match (&next.selected_layer_id, deleted_layout) {
        (Some(selected), Some(root)) => root.subtree_ids().contains(&selected.as_str()),
        _ => false,
    };
    if selected_inside {
        next.selected_layer_id = None;
    }
    next.components.remove(component_id);
    next.touch();
    Ok(next)
}

/// Id of some component whose layout instances `component_id`, if any.
fn instancing_component(project: &Project, component_id: &str) -> Option<String> {
    for (id, component) in &project.components {
        let Some(root) = &component.layout else { continue };
        let mut found = false;
        root.visit(&mut |layer| {
            if let Layer::Component(instance) = layer {
                if instance.component_id == component_id {
                    found = true;
                }
            }
        });
        if found {
            return Some(id.clone());
        }
    }
    None
}

// --- Layers ---

fn add_layer(
    project: &Project,
    component_id: &str,
    layer_type: LayerType,
    layer_id: &str,
    parent_layer_id: Option<&str>,
    source_component_id: Option<&str>,
) -> Result<Project> {
    if project.layer_id_exists(layer_id) {
        return Err(EngineError::InvalidArgument(format!(
            "layer id {layer_id} already in use"
        )));
    }
    if source_component_id == Some(component_id) {
        return Err(EngineError::InvalidArgument(format!(
            "component {component_id} cannot instance itself"
        )));
    }
    let new_layer = project.make_layer(layer_type, layer_id, source_component_id)?;
    let layout = project.component(component_id)?.layout.clone();

    // An explicit parent wins; otherwise the current selection is the
    // insertion target. Both are replayed state, so this stays
    // deterministic.
    let target = parent_layer_id.or(project.selected_layer_id.as_deref());
    let new_root = tree_ops::add_layer_under_selection(layout, target, new_layer)?;

    let mut next = project.clone();
    next.component_mut(component_id)?.layout = Some(new_root);
    next.selected_layer_id = Some(layer_id.to_string());
    next.touch();
    Ok(next)
}

fn rename_layer(
    project: &Project,
    component_id: &str,
    layer_id: &str,
    name: &str,
) -> Result<Project> {
    let layout = required_layout(project, component_id, layer_id)?;
    let mut renamed = tree_ops::find_layer_by_id(&layout, layer_id)?.clone();
    renamed.set_name(name);
    let new_root = tree_ops::update_layer(Some(layout), renamed);

    let mut next = project.clone();
    next.component_mut(component_id)?.layout = Some(new_root);
    next.touch();
    Ok(next)
}

fn delete_layer(project: &Project, component_id: &str, layer_id: &str) -> Result<Project> {
    let layout = required_layout(project, component_id, layer_id)?;
    tree_ops::find_layer_by_id(&layout, layer_id)?;
    let new_root = tree_ops::delete_layer(layout, layer_id);

    let mut next = project.clone();
    // Selection falls back to the surviving root, if any
    next.selected_layer_id = new_root.as_ref().map(|root| root.id().to_string());
    next.component_mut(component_id)?.layout = new_root;
    next.touch();
    Ok(next)
}

fn move_layer(
    project: &Project,
    component_id: &str,
    layer_id: &str,
    position: &InsertPosition,
) -> Result<Project> {
    let layout = required_layout(project, component_id, layer_id)?;
    let new_root = tree_ops::move_layer(layout, layer_id, position)?;

    let mut next = project.clone();
    next.component_mut(component_id)?.layout = Some(new_root);
    next.touch();
    Ok(next)
}

fn update_layer(project: &Project, component_id: &str, layer: &Layer) -> Result<Project> {
    let layout = project.component(component_id)?.layout.clone();

    // The replacement subtree must not reuse ids that live elsewhere in
    // the document; layer ids are unique document-wide.
    let replaced_ids: BTreeSet<String> = match &layout {
        Some(root) => tree_ops::find_layer_by_id(root, layer.id())?
            .subtree_ids()
            .into_iter()
            .map(str::to_string)
            .collect(),
        None => BTreeSet::new(),
    };
    let mut outside = project.all_layer_ids();
    for id in &replaced_ids {
        outside.remove(id);
    }
    for id in layer.subtree_ids() {
        if outside.contains(id) {
            return Err(EngineError::InvalidArgument(format!(
                "layer id {id} already in use"
            )));
        }
    }

    let new_root = tree_ops::update_layer(layout, layer.clone());
    let mut next = project.clone();
    next.component_mut(component_id)?.layout = Some(new_root);
    next.touch();
    Ok(next)
}

fn select_layer(project: &Project, layer_id: Option<&str>) -> Result<Project> {
    if let Some(id) = layer_id {
        if !project.layer_id_exists(id) {
            return Err(EngineError::NotFound(format!("layer {id}")));
        }
    }
    let mut next = project.clone();
    next.selected_layer_id = layer_id.map(str::to_string);
    // Selection is transient UI state; it does not dirty the document
    Ok(next)
}

/// The component's layout, which must exist for layer edits to make sense.
fn required_layout(project: &Project, component_id: &str, layer_id: &str) -> Result<Layer> {
    project
        .component(component_id)?
        .layout
        .clone()
        .ok_or_else(|| EngineError::NotFound(format!("layer {layer_id}")))
}

// --- Component props ---

fn add_component_prop(project: &Project, component_id: &str, prop: &str) -> Result<Project> {
    let mut next = project.clone();
    let component = next.component_mut(component_id)?;
    if component.has_prop(prop) {
        return Err(EngineError::InvalidArgument(format!(
            "prop {prop} already declared on component {component_id}"
        )));
    }
    component.props.push(PropDefinition::text(prop));
    next.touch();
    Ok(next)
}

/// Rename the prop declaration. Bindings and instance usages that
/// reference the old name are intentionally left untouched; they resolve
/// to nothing until re-bound.
fn edit_component_prop(
    project: &Project,
    component_id: &str,
    old_prop: &str,
    new_prop: &str,
) -> Result<Project> {
    let mut next = project.clone();
    let component = next.component_mut(component_id)?;
    if component.has_prop(new_prop) {
        return Err(EngineError::InvalidArgument(format!(
            "prop {new_prop} already declared on component {component_id}"
        )));
    }
    let declaration = component
        .props
        .iter_mut()
        .find(|p| p.name == old_prop)
        .ok_or_else(|| EngineError::NotFound(format!("prop {old_prop} on component {component_id}")))?;
    declaration.name = new_prop.to_string();
    next.touch();
    Ok(next)
}

/// Delete a prop declaration and sweep out every reference to it:
///
/// 1. in the owning component's layout, strip every binding whose *source*
///    is the prop;
/// 2. in every component's layout, for every instance layer of the owning
///    component, drop the prop's entry from both the value-assignment map
///    and the binding map.
///
/// The sweep visits every layer of every component — a missed layer would
/// leave a dangling reference to a prop that no longer exists.
fn delete_component_prop(project: &Project, component_id: &str, prop: &str) -> Result<Project> {
    let mut next = project.clone();
    {
        let component = next.component_mut(component_id)?;
        let declared = component.props.len();
        component.props.retain(|p| p.name != prop);
        if component.props.len() == declared {
            return Err(EngineError::NotFound(format!(
                "prop {prop} on component {component_id}"
            )));
        }
        if let Some(root) = component.layout.as_mut() {
            root.visit_mut(&mut |layer| {
                layer.retain_bindings(|_, binding| binding.prop_name != prop);
            });
        }
    }
    for component in next.components.values_mut() {
        if let Some(root) = component.layout.as_mut() {
            root.visit_mut(&mut |layer| {
                if let Layer::Component(instance) = layer {
                    if instance.component_id == component_id {
                        instance.props.remove(prop);
                        instance.bindings.remove(prop);
                    }
                }
            });
        }
    }
    next.touch();
    Ok(next)
}

// --- Component examples ---

fn add_component_example(project: &Project, component_id: &str, name: &str) -> Result<Project> {
    let mut next = project.clone();
    let component = next.component_mut(component_id)?;
    if component.examples.iter().any(|e| e.name == name) {
        return Err(EngineError::InvalidArgument(format!(
            "example {name} already exists on component {component_id}"
        )));
    }
    component.examples.push(ComponentExample {
        name: name.to_string(),
        props: Default::default(),
    });
    next.touch();
    Ok(next)
}

fn delete_component_example(project: &Project, component_id: &str, name: &str) -> Result<Project> {
    let mut next = project.clone();
    let component = next.component_mut(component_id)?;
    let count = component.examples.len();
    component.examples.retain(|e| e.name != name);
    if component.examples.len() == count {
        return Err(EngineError::NotFound(format!(
            "example {name} on component {component_id}"
        )));
    }
    next.touch();
    Ok(next)
}

fn set_component_example_prop(
    project: &Project,
    component_id: &str,
    example: &str,
    prop: &str,
    value: &str,
) -> Result<Project> {
    let mut next = project.clone();
    let component = next.component_mut(component_id)?;
    if !component.has_prop(prop) {
        return Err(EngineError::InvalidArgument(format!(
            "prop {prop} is not declared on component {component_id}"
        )));
    }
    let example = component
        .example_mut(example)
        .ok_or_else(|| EngineError::NotFound(format!("example {example} on component {component_id}")))?;
    example.props.insert(prop.to_string(), value.to_string());
    next.touch();
    Ok(next)
}
