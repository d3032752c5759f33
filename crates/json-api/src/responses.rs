//! Response envelopes

use std::fmt::Debug;

use salvo::oapi::ToSchema;
use serde::{Deserialize, Serialize};

/// Success body wrapper: `{ "data": ... }`.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub(crate) struct Data<T: ToSchema + Debug + 'static> {
    pub data: T,
}

impl<T: ToSchema + Debug + 'static> Data<T> {
    pub(crate) fn new(data: T) -> Self {
        Self { data }
    }
}
