// Request construction — immutable descriptors and upload payload encodings.

pub mod descriptor;
pub mod encoding;
