#![no_main]
use erlext::ext::{VERSION_MAGIC, decoder_for};
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    // Steer the fuzzer onto decodable tags: prefix the version byte and
    // replace the first byte with a tag that has a decoder.
    let Some((&first, rest)) = data.split_first() else {
        return;
    };
    let decodable: Vec<u8> = (0..=u8::MAX).filter(|&t| decoder_for(t).is_some()).collect();
    let tag = decodable[usize::from(first) % decodable.len()];

    let mut input = Vec::with_capacity(data.len() + 1);
    input.push(VERSION_MAGIC);
    input.push(tag);
    input.extend_from_slice(rest);

    if let Ok(term) = erlext::decode(&input) {
        assert!(term.matches(&term) || format!("{term}").contains("NaN"));
    }
});
