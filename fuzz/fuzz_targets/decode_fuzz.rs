#![no_main]
use erlext::DecodeOptions;
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    // Arbitrary bytes must only ever produce errors, never panics.
    let _ = erlext::decode(data);

    let strict = DecodeOptions {
        verify_size_hint: true,
        reject_trailing: true,
    };
    let _ = erlext::decode_with(data, &strict);
    let _ = erlext::ext::inspect(data);
});
