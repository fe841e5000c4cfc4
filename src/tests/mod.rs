mod common;
mod key_decoding;
