pub mod air;
pub mod attachments;
pub mod common;
pub mod generation;
pub mod result;
pub mod task;
pub mod upload;

pub use air::*;
pub use attachments::{
    AcceleratorOptions, ControlNet, Embedding, IpAdapter, Lora, Outpainting, Refiner,
};
pub use common::*;
pub use generation::*;
pub use result::*;
pub use task::*;
pub use upload::*;
