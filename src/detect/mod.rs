// Payload format detection — image signature sniffing.

pub mod image;
