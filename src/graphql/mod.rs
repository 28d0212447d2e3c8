//! GraphQL layer: SDL projection of content models, per-field resolvers,
//! response envelopes and the locale API schema.

pub mod envelope;
pub mod i18n;
pub mod projector;
pub mod resolvers;

pub use envelope::{BooleanResponse, ErrorObject};
pub use i18n::{build_i18n_schema, I18nSchema};
pub use projector::{validate_sdl, RenderedField, SchemaProjector};
pub use resolvers::{
    FieldResolveParams, FieldResolver, ResolvedEntry, ResolverDef, ResolverFactory, ResolverMap,
};
