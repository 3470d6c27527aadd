use nutype::nutype;

/// Opaque identifier assigned to a sent email by the provider.
///
/// Only used to correlate a submission with the provider's logs.
#[nutype(derive(
    Debug,
    Clone,
    PartialEq,
    Eq,
    Hash,
    From,
    Deref,
    Display,
    Serialize,
    Deserialize
))]
pub struct EmailId(String);
