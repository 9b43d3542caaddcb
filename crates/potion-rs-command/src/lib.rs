//! Effect command dispatch: permission gate, effect lookup and host mutation.

pub mod dispatcher;
pub mod effects;
pub mod error;
pub mod host;

pub use dispatcher::{Delivery, Dispatcher, UnknownEffectPolicy, TICKS_PER_SECOND};
pub use effects::VanillaEffects;
pub use error::{Denial, DenialReason};
pub use host::{
    Authorization, Caller, CallerId, DisplayFlags, EffectCategory, EffectDefinition, EffectHost,
    EffectInstance, EffectRegistry,
};
