#![no_main]

use libfuzzer_sys::fuzz_target;
use rlebp::{decode, Encoder};

fuzz_target!(|data: &[u8]| {
    if data.len() < 2 {
        return;
    }

    // First byte picks the bit width; remaining bytes are (value, repeat) pairs
    let bit_width = u32::from(data[0] % 32) + 1;
    let mask = if bit_width == 32 { u32::MAX } else { (1u32 << bit_width) - 1 };

    let mut values = Vec::new();
    for chunk in data[1..].chunks(5) {
        if chunk.len() < 5 {
            break;
        }
        let v = u32::from_le_bytes([chunk[0], chunk[1], chunk[2], chunk[3]]) & mask;
        let repeat = usize::from(chunk[4] % 40) + 1;
        values.extend(std::iter::repeat_n(v, repeat));
    }

    let mut enc = Encoder::new(bit_width);
    enc.extend(values.iter().copied()).expect("values are masked to the bit width");
    assert_eq!(enc.len(), values.len() as u64, "count mismatch");
    let bytes = enc.finish();

    let decoded = decode(&bytes, bit_width, values.len()).expect("encoded stream must decode");
    assert_eq!(decoded.len(), values.len(), "decode length mismatch");
    for (d, v) in decoded.iter().zip(values.iter()) {
        assert_eq!(*d as u32, *v, "value mismatch");
    }
});
