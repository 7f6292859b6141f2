//! Adapters: concrete implementations of the port traits.
//!
//! | Adapter        | Implements   | Connects to                  |
//! |----------------|--------------|------------------------------|
//! | `config_store` | ConfigPort   | JSON file / postcard blob    |
//! | `sim_adc`      | AnalogPort   | injected readings            |

pub mod config_store;
pub mod sim_adc;
