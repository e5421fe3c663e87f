//! Signals the host sends to the interpreter

use serde::{Deserialize, Serialize};

/// External signals that move the interpreter forward
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub enum Signal {
    /// Player pressed continue
    Advance,
    /// Player picked the option with this key
    Choose { key: String },
    /// Host closed the session
    Cancel,
}
