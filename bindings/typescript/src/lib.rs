use napi::bindgen_prelude::*;
use napi::Task;
use napi_derive::napi;

/// Inputs at least this large are split across the rayon pool.
const PARALLEL_THRESHOLD: usize = 1 << 20;

fn to_napi_err(e: base91_core::Base91Error) -> Error {
    Error::from_reason(e.to_string())
}

fn encode_bytes(data: &[u8]) -> Result<String> {
    let text = if data.len() >= PARALLEL_THRESHOLD {
        base91_core::encode_parallel(data)
    } else {
        base91_core::encode_to_vec(data)
    }
    .map_err(to_napi_err)?;
    String::from_utf8(text).map_err(|e| Error::from_reason(e.to_string()))
}

fn decode_text(text: &[u8]) -> Result<Vec<u8>> {
    if text.len() >= PARALLEL_THRESHOLD {
        base91_core::decode_parallel(text)
    } else {
        base91_core::decode_to_vec(text)
    }
    .map_err(to_napi_err)
}

/// Encode binary data as base91 text.
///
/// @param data - The bytes to encode.
/// @returns The base91 string.
#[napi]
pub fn encode(data: Buffer) -> Result<String> {
    encode_bytes(data.as_ref())
}

/// Encode from a Uint8Array (for browser/Deno compatibility).
///
/// @param data - The bytes to encode.
/// @returns The base91 string.
#[napi]
pub fn encode_from_uint8_array(data: Uint8Array) -> Result<String> {
    encode_bytes(data.as_ref())
}

/// Decode base91 text into a Buffer.
///
/// @param text - The base91 string.
/// @returns The decoded bytes.
/// @throws If the text has an impossible length or a symbol outside the alphabet.
#[napi]
pub fn decode(text: String) -> Result<Buffer> {
    Ok(Buffer::from(decode_text(text.as_bytes())?))
}

/// Decode base91 text into a Uint8Array (for browser/Deno compatibility).
///
/// @param text - The base91 string.
/// @returns The decoded bytes.
#[napi]
pub fn decode_to_uint8_array(text: String) -> Result<Uint8Array> {
    Ok(Uint8Array::from(decode_text(text.as_bytes())?))
}

/// Number of symbols produced by encoding `length` bytes.
///
/// @param length - Input length in bytes.
/// @throws If the length is negative or above the maximum encode length.
#[napi]
pub fn encoded_length(length: i64) -> Result<u32> {
    let length = base91_core::checked_length(length).map_err(to_napi_err)?;
    let symbols = base91_core::encoded_length(length).map_err(to_napi_err)?;
    // the maximum encode length is chosen so this always fits
    u32::try_from(symbols).map_err(|e| Error::from_reason(e.to_string()))
}

/// Number of bytes recovered from `length` symbols, or null when no encoder
/// output has that length.
///
/// @param length - Text length in symbols.
/// @throws If the length is negative.
#[napi]
pub fn decoded_length(length: i64) -> Result<Option<i64>> {
    let length = base91_core::checked_length(length).map_err(to_napi_err)?;
    Ok(base91_core::decoded_length(length).map(|n| n as i64))
}

/// Whether `text` is decodable base91 (valid length and alphabet).
#[napi]
pub fn is_valid(text: String) -> bool {
    base91_core::is_valid_text(text.as_bytes())
}

/// Name of the vector tier selected on this machine.
#[napi]
pub fn simd_tier() -> String {
    base91_core::Tier::detect().to_string()
}

// --- Async versions (run on libuv thread pool) ---

pub struct EncodeTask {
    data: Vec<u8>,
}

impl Task for EncodeTask {
    type Output = String;
    type JsValue = String;

    fn compute(&mut self) -> Result<Self::Output> {
        encode_bytes(&self.data)
    }

    fn resolve(&mut self, _env: Env, output: Self::Output) -> Result<Self::JsValue> {
        Ok(output)
    }
}

/// Async version of encode that runs on the libuv thread pool.
/// Returns a Promise<string>.
///
/// @param data - The bytes to encode.
/// @returns A Promise resolving to the base91 string.
#[napi]
pub fn encode_async(data: Buffer) -> AsyncTask<EncodeTask> {
    AsyncTask::new(EncodeTask {
        data: data.to_vec(),
    })
}

pub struct DecodeTask {
    text: String,
}

impl Task for DecodeTask {
    type Output = Vec<u8>;
    type JsValue = Buffer;

    fn compute(&mut self) -> Result<Self::Output> {
        decode_text(self.text.as_bytes())
    }

    fn resolve(&mut self, _env: Env, output: Self::Output) -> Result<Self::JsValue> {
        Ok(Buffer::from(output))
    }
}

/// Async version of decode that runs on the libuv thread pool.
/// Returns a Promise<Buffer>.
///
/// @param text - The base91 string.
/// @returns A Promise resolving to the decoded bytes.
#[napi]
pub fn decode_async(text: String) -> AsyncTask<DecodeTask> {
    AsyncTask::new(DecodeTask { text })
}
