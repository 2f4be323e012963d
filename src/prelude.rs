pub use crate::error::{IoError, ModelError};
pub use crate::math::*;
pub use crate::model::{
    Gate, GateGradient, LstmModel, SerializableGateWeight, SerializableLstmModel,
};
pub use crate::utility::{MinMaxScaler, make_windows};
