//! Style property dispatch.
//!
//! A [`StyleRegistry`] maps `(behavior type, property name)` to a converter
//! and a typed setter. Applying a property looks up the entry for the
//! node's behavior, converts the string value and only then calls the
//! setter, so an unknown name or a bad value never reaches the behavior.
//!
//! ```ignore
//! let registry = StyleRegistry::with_builtin();
//! registry.apply(&mut tree, label, "text-color", "#FFFFFF", &mut device)?;
//! ```

mod converter;

pub use converter::{
    ConvertContext, ConvertError, FontConverter, ParseConverter, StringConverter, StyleConverter,
};

use std::any::TypeId;

use tessera_core::alloc::HashMap;
use tessera_core::{HAlign, VAlign};
use tessera_render::{Color, RenderDevice, RenderError};

use crate::behavior::Behavior;
use crate::error::UiResult;
use crate::tree::{NodeId, NodeTree};
use crate::widgets::Label;

#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum StyleError {
    #[error("unknown style property '{property}' for {target}")]
    UnknownProperty {
        property: String,
        target: &'static str,
    },

    #[error("invalid value '{value}' for style property '{property}': {reason}")]
    Conversion {
        property: String,
        value: String,
        reason: String,
    },

    /// The node has no behavior to receive the property.
    #[error("style property '{property}' applied to a node without a behavior")]
    NoBehavior { property: String },

    #[error(transparent)]
    Resource(#[from] RenderError),
}

type ApplyFn = Box<dyn Fn(&mut dyn Behavior, &str, &mut ConvertContext<'_>) -> Result<(), ConvertError>>;

struct PropertyEntry {
    apply: ApplyFn,
}

/// Registered style properties, keyed by behavior type and property name.
#[derive(Default)]
pub struct StyleRegistry {
    properties: HashMap<(TypeId, String), PropertyEntry>,
}

impl StyleRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// A registry with the properties of the built-in behaviors.
    pub fn with_builtin() -> Self {
        let mut registry = Self::new();
        registry.register::<Label, _>("text", StringConverter, |label, text| label.set_text(text));
        registry.register::<Label, _>("text-color", ParseConverter::<Color>::new(), |label, color| {
            label.set_color(color)
        });
        registry.register::<Label, _>("font", FontConverter, |label, font| label.set_font(font));
        registry.register::<Label, _>("text-halign", ParseConverter::<HAlign>::new(), |label, align| {
            label.set_halign(align)
        });
        registry.register::<Label, _>("text-valign", ParseConverter::<VAlign>::new(), |label, align| {
            label.set_valign(align)
        });
        registry
    }

    /// Register `name` for behaviors of type `B`, replacing an earlier entry.
    pub fn register<B, C>(
        &mut self,
        name: impl Into<String>,
        converter: C,
        setter: impl Fn(&mut B, C::Output) + 'static,
    ) where
        B: Behavior,
        C: StyleConverter + 'static,
    {
        let apply: ApplyFn = Box::new(
            move |behavior: &mut dyn Behavior, value: &str, cx: &mut ConvertContext<'_>| {
                let converted = converter.convert(value, cx)?;
                let target = behavior.as_any_mut().downcast_mut::<B>().ok_or_else(|| {
                    ConvertError::Invalid(format!("behavior is not a {}", std::any::type_name::<B>()))
                })?;
                setter(target, converted);
                Ok(())
            },
        );
        self.properties
            .insert((TypeId::of::<B>(), name.into()), PropertyEntry { apply });
    }

    pub fn is_registered<B: Behavior>(&self, name: &str) -> bool {
        self.properties
            .contains_key(&(TypeId::of::<B>(), name.to_string()))
    }

    /// Property names registered for `B`, sorted.
    pub fn properties<B: Behavior>(&self) -> Vec<&str> {
        let type_id = TypeId::of::<B>();
        let mut names: Vec<&str> = self
            .properties
            .keys()
            .filter(|(id, _)| *id == type_id)
            .map(|(_, name)| name.as_str())
            .collect();
        names.sort_unstable();
        names
    }

    /// Set property `name` to `value` on the behavior of node `id`.
    ///
    /// The behavior's invalidation is applied to the tree afterwards, so a
    /// successful `text` change leaves the node `LAYOUT | REDRAW`.
    pub fn apply(
        &self,
        tree: &mut NodeTree,
        id: NodeId,
        name: &str,
        value: &str,
        device: &mut dyn RenderDevice,
    ) -> UiResult<()> {
        let outcome = tree.update_behavior(id, |behavior| {
            let key = (behavior.as_any().type_id(), name.to_string());
            let Some(entry) = self.properties.get(&key) else {
                return Err(StyleError::UnknownProperty {
                    property: name.to_string(),
                    target: behavior.type_name(),
                });
            };
            let mut cx = ConvertContext::new(device);
            (entry.apply)(behavior, value, &mut cx).map_err(|err| match err {
                ConvertError::Invalid(reason) => StyleError::Conversion {
                    property: name.to_string(),
                    value: value.to_string(),
                    reason,
                },
                ConvertError::Resource(err) => StyleError::Resource(err),
            })
        })?;

        match outcome {
            Some(result) => {
                if let Err(err) = &result {
                    tracing::warn!(node = %id, property = name, %err, "style property rejected");
                }
                Ok(result?)
            }
            None => Err(StyleError::NoBehavior {
                property: name.to_string(),
            }
            .into()),
        }
    }

    /// Apply `(name, value)` pairs in order, stopping at the first failure.
    pub fn apply_all<'p>(
        &self,
        tree: &mut NodeTree,
        id: NodeId,
        properties: impl IntoIterator<Item = (&'p str, &'p str)>,
        device: &mut dyn RenderDevice,
    ) -> UiResult<()> {
        for (name, value) in properties {
            self.apply(tree, id, name, value, device)?;
        }
        Ok(())
    }
}

impl std::fmt::Debug for StyleRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("StyleRegistry")
            .field("properties", &self.properties.len())
            .finish()
    }
}
