//! The preconfirmation ordering actor and its components.

mod actor;
pub use actor::{
    PreconfActor, PreconfActorError, PreconfConfig, PreconfInboundData, PreconfSendError,
};

mod admission;
pub use admission::{AdmissionError, PreconfAdmission};

mod state;
pub use state::{OrderingState, ReadyEvent};
