//! base91 Demo - Encode and decode example
//!
//! Run with: RUST_LOG=debug cargo run --example demo

use std::io::Write;

use base91_core::{
    decode_to_vec, encode_to_string, encoded_length, is_valid_text, DecoderWriter, EncoderWriter,
    Tier,
};

fn main() {
    env_logger::init();

    println!("=== base91 Demo ===\n");

    println!("1. Detected tier: {}", Tier::detect());
    let available: Vec<String> = Tier::available().map(|t| t.to_string()).collect();
    println!("   Available tiers: {}\n", available.join(", "));

    // One-shot encode of a short message
    let message = b"Hello, base91!";
    let text = encode_to_string(message).expect("Failed to encode");
    println!("2. Encoded {} bytes to: {}", message.len(), text);
    println!(
        "   Length: {} symbols (predicted {})\n",
        text.len(),
        encoded_length(message.len()).expect("length in range")
    );

    let decoded = decode_to_vec(text.as_bytes()).expect("Failed to decode");
    println!("3. Decoded back: {:?}", String::from_utf8_lossy(&decoded));
    println!("   Valid text: {}\n", is_valid_text(text.as_bytes()));

    // Streaming through the io adapters
    let payload: Vec<u8> = (0..=255u8).cycle().take(1000).collect();
    let mut encoder = EncoderWriter::new(Vec::new());
    for chunk in payload.chunks(37) {
        encoder.write_all(chunk).expect("Failed to write");
    }
    let streamed = encoder.finish().expect("Failed to finish encoding");
    println!("4. Streamed {} bytes into {} symbols", payload.len(), streamed.len());

    let mut decoder = DecoderWriter::new(Vec::new());
    decoder.write_all(&streamed).expect("Failed to write");
    let restored = decoder.finish().expect("Failed to finish decoding");
    println!("   Round trip intact: {}", restored == payload);

    // Rejected input
    println!("\n5. Validation:");
    for sample in [&b"$$"[..], b"$", b"\\$"] {
        println!("   {:?} -> {:?}", String::from_utf8_lossy(sample), decode_to_vec(sample));
    }

    println!("\n=== Demo Complete ===");
    println!("\nSee README.md for Python and TypeScript usage.");
}
