#![no_main]

use libfuzzer_sys::fuzz_target;
use rlebp::{runs, Decoder};

fuzz_target!(|data: &[u8]| {
    // First byte picks the bit width, the rest is the stream.
    // Arbitrary input may fail to decode but must never panic.
    let Some((&w, stream)) = data.split_first() else {
        return;
    };
    let bit_width = u32::from(w % 32) + 1;

    let mut dec = Decoder::new(bit_width);
    dec.init(stream);
    let mut batch = Decoder::new(bit_width);
    batch.init(stream);

    let mut decoded = Vec::new();
    loop {
        match dec.next() {
            Ok(v) => decoded.push(v),
            Err(e) => {
                assert!(e.is_data_error(), "internal fault: {e}");
                break;
            }
        }
        assert!(dec.position() <= stream.len());
        if decoded.len() > 1 << 16 {
            break;
        }
    }

    // Batch decoding must agree with value-at-a-time decoding
    let mut out = vec![0; decoded.len()];
    assert_eq!(batch.next_batch(&mut out).unwrap(), decoded.len());
    assert_eq!(out, decoded);

    for span in runs(stream, bit_width).expect("width is in range") {
        if span.is_err() {
            break;
        }
    }
});
