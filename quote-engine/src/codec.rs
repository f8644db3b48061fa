use crate::domain::DetailedQuote;
use bytes::{Buf, BufMut, Bytes, BytesMut};
use chrono::DateTime;
use shared::{Error, Result};
use tracing::warn;

const F64_FIELDS: usize = 8;

/// Encode a DetailedQuote into the cache blob layout
///
/// Format (big-endian):
/// [symbol_len: u32][symbol bytes][name_len: u32][name bytes]
/// [timestamp_secs: i64][timestamp_nanos: u32]
/// [open][high][low][close][volume][previous_close][change][change_percent] as f64
pub fn encode(quote: &DetailedQuote) -> Bytes {
    let mut buf = BytesMut::with_capacity(
        4 + quote.symbol.len() + 4 + quote.name.len() + 12 + F64_FIELDS * 8,
    );

    put_string(&mut buf, &quote.symbol);
    put_string(&mut buf, &quote.name);

    buf.put_i64(quote.timestamp.timestamp());
    buf.put_u32(quote.timestamp.timestamp_subsec_nanos());

    buf.put_f64(quote.open);
    buf.put_f64(quote.high);
    buf.put_f64(quote.low);
    buf.put_f64(quote.close);
    buf.put_f64(quote.volume);
    buf.put_f64(quote.previous_close);
    buf.put_f64(quote.change);
    buf.put_f64(quote.change_percent);

    buf.freeze()
}

/// Decode a cache blob, reporting malformed or truncated input as an error
pub fn try_decode(mut buf: Bytes) -> Result<DetailedQuote> {
    if buf.is_empty() {
        return Err(Error::MalformedRecord("empty buffer".to_string()));
    }

    let symbol = get_string(&mut buf, "symbol")?;
    let name = get_string(&mut buf, "name")?;

    if buf.remaining() < 12 {
        return Err(Error::MalformedRecord("missing timestamp".to_string()));
    }
    let secs = buf.get_i64();
    let nanos = buf.get_u32();
    let timestamp = DateTime::from_timestamp(secs, nanos).ok_or_else(|| {
        Error::MalformedRecord(format!("timestamp out of range: {}s {}ns", secs, nanos))
    })?;

    if buf.remaining() != F64_FIELDS * 8 {
        return Err(Error::MalformedRecord(format!(
            "expected {} bytes of prices, got {}",
            F64_FIELDS * 8,
            buf.remaining()
        )));
    }

    Ok(DetailedQuote {
        symbol,
        name,
        timestamp,
        open: buf.get_f64(),
        high: buf.get_f64(),
        low: buf.get_f64(),
        close: buf.get_f64(),
        volume: buf.get_f64(),
        previous_close: buf.get_f64(),
        change: buf.get_f64(),
        change_percent: buf.get_f64(),
    })
}

/// Decode a cache blob; malformed input yields the empty quote (blank symbol)
pub fn decode(buf: Bytes) -> DetailedQuote {
    match try_decode(buf) {
        Ok(quote) => quote,
        Err(e) => {
            warn!("Discarding cached detailed quote: {}", e);
            DetailedQuote::default()
        }
    }
}

fn put_string(buf: &mut BytesMut, value: &str) {
    let bytes = value.as_bytes();
    buf.put_u32(bytes.len() as u32);
    buf.put_slice(bytes);
}

fn get_string(buf: &mut Bytes, field: &str) -> Result<String> {
    if buf.remaining() < 4 {
        return Err(Error::MalformedRecord(format!("missing {} length", field)));
    }
    let len = buf.get_u32() as usize;
    if buf.remaining() < len {
        return Err(Error::MalformedRecord(format!(
            "{} truncated: expected {} bytes, got {}",
            field,
            len,
            buf.remaining()
        )));
    }
    let raw = buf.copy_to_bytes(len);
    String::from_utf8(raw.to_vec())
        .map_err(|e| Error::MalformedRecord(format!("invalid {} UTF-8: {}", field, e)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};

    fn sample_quote() -> DetailedQuote {
        DetailedQuote {
            symbol: "AAPL".to_string(),
            name: "Apple Inc".to_string(),
            timestamp: Utc.with_ymd_and_hms(2024, 3, 15, 14, 30, 5).unwrap()
                + chrono::Duration::nanoseconds(123_456_789),
            open: 171.25,
            high: 173.5,
            low: 170.75,
            close: 172.62,
            volume: 52_345_100.0,
            previous_close: 171.13,
            change: 1.49,
            change_percent: 0.8707,
        }
    }

    #[test]
    fn test_encode_decode_preserves_every_field() {
        let quote = sample_quote();
        let decoded = try_decode(encode(&quote)).unwrap();
        assert_eq!(decoded, quote);
    }

    #[test]
    fn test_encode_decode_unicode_and_empty_name() {
        let mut quote = sample_quote();
        quote.name = String::new();
        quote.symbol = "BRK.B".to_string();
        assert_eq!(try_decode(encode(&quote)).unwrap(), quote);

        quote.name = "Société Générale".to_string();
        quote.change = -2.5;
        assert_eq!(try_decode(encode(&quote)).unwrap(), quote);
    }

    #[test]
    fn test_field_order_is_fixed() {
        let encoded = encode(&sample_quote());
        let mut buf = encoded.clone();
        assert_eq!(buf.get_u32(), 4);
        assert_eq!(&buf.copy_to_bytes(4)[..], b"AAPL");
        assert_eq!(buf.get_u32(), 9);
        assert_eq!(&buf.copy_to_bytes(9)[..], b"Apple Inc");
        buf.advance(12);
        assert_eq!(buf.get_f64(), 171.25); // open
        assert_eq!(buf.get_f64(), 173.5); // high
    }

    #[test]
    fn test_truncated_buffer_is_malformed() {
        let encoded = encode(&sample_quote());
        for cut in [1, 5, 20, encoded.len() - 1] {
            let result = try_decode(encoded.slice(..cut));
            assert!(matches!(result, Err(Error::MalformedRecord(_))), "cut at {}", cut);
        }
    }

    #[test]
    fn test_trailing_bytes_are_malformed() {
        let mut buf = BytesMut::from(&encode(&sample_quote())[..]);
        buf.put_u8(0xFF);
        assert!(matches!(
            try_decode(buf.freeze()),
            Err(Error::MalformedRecord(_))
        ));
    }

    #[test]
    fn test_decode_malformed_returns_empty_quote() {
        let quote = decode(Bytes::from_static(b"\x00\x00\x00\xFFgarbage"));
        assert!(quote.is_empty());
        assert_eq!(quote, DetailedQuote::default());

        assert!(decode(Bytes::new()).is_empty());
    }

    #[test]
    fn test_invalid_utf8_is_malformed() {
        let mut buf = BytesMut::new();
        buf.put_u32(2);
        buf.put_slice(&[0xC3, 0x28]);
        assert!(matches!(
            try_decode(buf.freeze()),
            Err(Error::MalformedRecord(_))
        ));
    }
}
