/// Reference resolution module.
///
/// Classifies the references found in raw links and resolves them into
/// concrete target identities, substituting placeholders for anything that
/// cannot be matched against the resource store.
mod classifier;
mod resolver;

pub use classifier::{classify, Reference, ReferenceKind};
pub use resolver::{LinkResolver, Resolution};
