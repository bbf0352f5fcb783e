//! [`NodeActor`] services for the preconfirmation pipeline.

mod traits;
pub use traits::NodeActor;

mod preconf;
pub use preconf::{
    AdmissionError, OrderingState, PreconfActor, PreconfActorError, PreconfAdmission,
    PreconfConfig, PreconfInboundData, PreconfSendError, ReadyEvent,
};
