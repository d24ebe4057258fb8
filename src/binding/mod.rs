//! Field binding engine.
//!
//! # Data Flow
//! ```text
//! Dataset (key → entry)
//!     → Bindable::bindings (ordered tag → &mut field table)
//!     → lookup tag, skip absent / null entries
//!     → ConfigField::assign (coercion, see field.rs)
//!     → listener notification per matched entry
//! ```
//!
//! # Design Decisions
//! - Binding tables are declared statically per type (hand-written impl,
//!   the `bindable!` macro, or the string map impls); nothing is inspected
//!   at runtime
//! - Scalar parse failures are swallowed per field; an unsupported field
//!   kind aborts the call immediately
//! - Notification is unconditional on every match, not only on change

use std::collections::BTreeMap;

use thiserror::Error;

use crate::listener::{self, Listener};
use crate::snapshot::Dataset;

pub mod field;

pub use field::{Coercion, ConfigField, FieldKind};

/// Errors that abort a bind call.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum BindError {
    /// The snapshot carried no dataset at all.
    #[error("snapshot has no dataset to bind")]
    MissingDataset,

    /// A bound field has a type the binder cannot coerce into.
    #[error("field '{tag}' has unsupported type {kind}")]
    UnsupportedFieldType { tag: String, kind: FieldKind },
}

/// One row of a binding table: a configuration key and the field it feeds.
pub struct Binding<'a> {
    tag: &'a str,
    field: &'a mut dyn ConfigField,
}

impl<'a> Binding<'a> {
    pub fn new<F: ConfigField + 'a>(tag: &'a str, field: &'a mut F) -> Self {
        Self { tag, field }
    }

    pub fn tag(&self) -> &str {
        self.tag
    }
}

/// A type whose fields can receive configuration values.
///
/// Implementations list their bound fields in declaration order; that order
/// is the order fields are written and listeners fire.
///
/// ```
/// use varconf_client::binding::{Bindable, Binding};
///
/// #[derive(Default)]
/// struct Limits {
///     max_conns: i64,
///     verbose: bool,
///     cached: Vec<u8>, // not bound
/// }
///
/// impl Bindable for Limits {
///     fn bindings(&mut self) -> Vec<Binding<'_>> {
///         vec![
///             Binding::new("limits.max_conns", &mut self.max_conns),
///             Binding::new("limits.verbose", &mut self.verbose),
///         ]
///     }
/// }
/// ```
pub trait Bindable {
    fn bindings(&mut self) -> Vec<Binding<'_>>;
}

/// Implement [`Bindable`] for a struct by listing `field => "tag"` pairs.
///
/// ```
/// #[derive(Default)]
/// struct AppConfig {
///     name: String,
///     port: i32,
///     ratio: f64,
/// }
///
/// varconf_client::bindable!(AppConfig {
///     name => "app.name",
///     port => "app.port",
///     ratio => "app.ratio",
/// });
/// ```
#[macro_export]
macro_rules! bindable {
    ($ty:ty { $($field:ident => $tag:expr),* $(,)? }) => {
        impl $crate::binding::Bindable for $ty {
            fn bindings(&mut self) -> ::std::vec::Vec<$crate::binding::Binding<'_>> {
                ::std::vec![$($crate::binding::Binding::new($tag, &mut self.$field)),*]
            }
        }
    };
}

/// Every pre-inserted key is bound as a string field, in key order.
impl Bindable for BTreeMap<String, String> {
    fn bindings(&mut self) -> Vec<Binding<'_>> {
        self.iter_mut()
            .map(|(key, value)| Binding::new(key.as_str(), value))
            .collect()
    }
}

/// Write every matching entry of `dataset` into `target`.
///
/// Returns the number of entries matched. Fields whose key is absent, or
/// whose entry is `null`, keep their previous value.
pub fn bind<B>(
    target: &mut B,
    dataset: Option<&Dataset>,
    listener: Option<&Listener>,
) -> Result<usize, BindError>
where
    B: Bindable + ?Sized,
{
    let dataset = dataset.ok_or(BindError::MissingDataset)?;

    let mut matched = 0;
    for Binding { tag, field } in target.bindings() {
        if tag.is_empty() {
            continue;
        }
        let Some(Some(entry)) = dataset.get(tag) else {
            continue;
        };

        let kind = field.kind();
        if !kind.is_supported() {
            return Err(BindError::UnsupportedFieldType {
                tag: tag.to_string(),
                kind,
            });
        }

        if field.assign(&entry.value) == Coercion::ParseFailed {
            tracing::debug!(
                key = %entry.key,
                value = %entry.value,
                kind = %kind,
                "Ignoring unparsable config value"
            );
        }
        matched += 1;

        listener::notify(listener, entry);
    }
    Ok(matched)
}
