//! Serde helper: JSON `null` reads back as NaN.
//!
//! serde_json writes non-finite floats as `null` (as browsers do), so any
//! float that can legitimately be NaN uses this on the way in.

use serde::{Deserialize, Deserializer};

pub(crate) fn deserialize<'de, D>(deserializer: D) -> Result<f64, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<f64>::deserialize(deserializer)?.unwrap_or(f64::NAN))
}
