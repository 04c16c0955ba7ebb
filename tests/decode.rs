//! Base64 デコードのテスト

use b64_transcoder::{
    Charset, Direction, TranscodeError, TranscodeOptions, Transcoder, decode, decode_with, encode,
    encode_with, transcode_auto,
};
use rand::Rng;

fn random_text(max_len: usize) -> String {
    let mut rng = rand::rng();
    let length = rng.random_range(1..=max_len);
    (0..length).map(|_| rng.random::<char>()).collect()
}

fn random_ascii(max_len: usize) -> String {
    let mut rng = rand::rng();
    let length = rng.random_range(1..=max_len);
    (0..length)
        .map(|_| char::from(rng.random_range(0u8..=0x7F)))
        .collect()
}

#[test]
fn round_trips_unicode() {
    for _ in 0..100 {
        let text = random_text(50);
        for charset in [Charset::Utf8, Charset::Utf16] {
            let encoded = encode_with(&text, charset).unwrap();
            assert_eq!(decode_with(&encoded, charset).unwrap(), text);
        }
    }
}

#[test]
fn round_trips_ascii() {
    for _ in 0..100 {
        let text = random_ascii(50);
        let encoded = encode(&text, "ASCII").unwrap();
        assert_eq!(decode(&encoded, "ASCII").unwrap(), text);
    }
}

#[test]
fn empty_input_fails() {
    assert_eq!(decode("", "UTF-8"), Err(TranscodeError::EmptyBase64));
    assert_eq!(
        decode("", "UTF-8").unwrap_err().to_string(),
        "No Base64 string provided for decoding"
    );
}

#[test]
fn hello_utf8() {
    assert_eq!(decode("SGVsbG8=", "UTF-8").unwrap(), "Hello");
}

#[test]
fn invalid_syntax() {
    let err = decode("not valid base64 !!", "UTF-8").unwrap_err();
    assert_eq!(err, TranscodeError::InvalidBase64);
    assert_eq!(err.to_string(), "Invalid Base64 input");
}

#[test]
fn syntax_checked_before_charset() {
    assert_eq!(
        decode("SGVsbG8@", "KLINGON"),
        Err(TranscodeError::InvalidBase64)
    );
    assert_eq!(
        decode("SGVsbG8=", "KLINGON"),
        Err(TranscodeError::UnsupportedCharset("KLINGON".into()))
    );
}

#[test]
fn missing_padding_is_tolerated() {
    assert_eq!(decode("SGVsbG8", "UTF-8").unwrap(), "Hello");
}

#[test]
fn partial_padding_fails_decoding() {
    for input in ["Zg=", "Zm9vYg="] {
        let err = decode(input, "UTF-8").unwrap_err();
        assert_eq!(
            err,
            TranscodeError::Decoding(format!(
                "padded input length {} is not a multiple of 4",
                input.len()
            ))
        );
    }
    // パディングなし、または正しいパディングは通る
    assert_eq!(decode("Zm9vYg", "UTF-8").unwrap(), "foob");
    assert_eq!(decode("Zm9vYg==", "UTF-8").unwrap(), "foob");
}

#[test]
fn padding_only_passes_syntax_but_fails_decoding() {
    let err = decode("====", "UTF-8").unwrap_err();
    assert_eq!(err.kind(), "decoding_failure");
    assert!(err.to_string().starts_with("Decoding error: "));
}

#[test]
fn impossible_length_fails_decoding() {
    // 5文字は3バイト境界に揃わない
    assert!(matches!(
        decode("SGVsb", "UTF-8"),
        Err(TranscodeError::Decoding(_))
    ));
}

#[test]
fn malformed_utf8_fails() {
    // 0xFF 0xFE は UTF-8 として不正
    let err = decode("//4=", "UTF-8").unwrap_err();
    assert!(matches!(err, TranscodeError::Decoding(_)));
}

#[test]
fn single_byte_charsets_map_bytes_to_latin1() {
    assert_eq!(decode("Y2Fm6Q==", "ISO-8859-1").unwrap(), "café");
    assert_eq!(decode("Y2Fm6Q==", "ASCII").unwrap(), "café");
    assert_eq!(decode("gP8=", "ASCII").unwrap(), "\u{80}\u{ff}");
}

#[test]
fn utf16_decoding() {
    assert_eq!(decode("SABpAA==", "UTF-16").unwrap(), "Hi");
    assert_eq!(decode("PdgA3g==", "UTF-16").unwrap(), "😀");
}

#[test]
fn utf16_odd_byte_count_fails() {
    // "Hi!" は3バイト
    let err = decode("SGkh", "UTF-16").unwrap_err();
    assert_eq!(
        err.to_string(),
        "Decoding error: UTF-16 input has an odd number of bytes (3)"
    );
}

#[test]
fn utf16_lone_surrogate_fails() {
    // 0xD83D 単独
    assert!(matches!(
        decode("Pdg=", "UTF-16"),
        Err(TranscodeError::Decoding(_))
    ));
}

#[test]
fn strict_mode_requires_padding() {
    let strict = Transcoder::new(TranscodeOptions {
        strict_base64: true,
        ..Default::default()
    });
    assert_eq!(strict.decode("SGVsbG8=", "UTF-8").unwrap(), "Hello");
    assert_eq!(
        strict.decode("SGVsbG8", "UTF-8"),
        Err(TranscodeError::InvalidBase64)
    );
    assert_eq!(
        strict.decode("====", "UTF-8"),
        Err(TranscodeError::InvalidBase64)
    );
}

#[test]
fn auto_picks_direction() {
    assert_eq!(
        transcode_auto("SGVsbG8=", "UTF-8").unwrap(),
        (Direction::Decode, "Hello".to_string())
    );
    assert_eq!(
        transcode_auto("Hello, world!", "UTF-8").unwrap(),
        (Direction::Encode, "SGVsbG8sIHdvcmxkIQ==".to_string())
    );
}

#[test]
fn auto_treats_alphabet_only_text_as_base64() {
    // "Hello" はアルファベットだけなのでデコードを試みて失敗する
    assert!(matches!(
        transcode_auto("Hello", "UTF-8"),
        Err(TranscodeError::Decoding(_))
    ));
}

#[test]
fn auto_follows_strict_mode() {
    let strict = Transcoder::new(TranscodeOptions {
        strict_base64: true,
        ..Default::default()
    });
    // 厳格モードではパディングなしは Base64 とみなさない
    assert_eq!(
        strict.transcode_auto("SGVsbG8", "UTF-8").unwrap(),
        (Direction::Encode, "U0dWc2JHOA==".to_string())
    );
    assert_eq!(
        strict.transcode_auto("SGVsbG8=", "UTF-8").unwrap(),
        (Direction::Decode, "Hello".to_string())
    );
}

#[test]
fn auto_empty_input_is_encode_failure() {
    assert_eq!(transcode_auto("", "UTF-8"), Err(TranscodeError::EmptyText));
}

#[test]
fn concurrent_calls_are_independent() {
    let handles: Vec<_> = (0..8)
        .map(|i| {
            std::thread::spawn(move || {
                let text = format!("thread {i} ✓");
                let encoded = encode(&text, "UTF-16").unwrap();
                assert_eq!(decode(&encoded, "UTF-16").unwrap(), text);
            })
        })
        .collect();
    for handle in handles {
        handle.join().unwrap();
    }
}
