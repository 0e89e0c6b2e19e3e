// Decoding many independent records.
//
// Each record gets its own cursor and nothing is shared between calls, so
// the records can be decoded on the rayon pool when the `parallel`
// feature is enabled. Results keep the input order.

use crate::ext::decoder::{DecodeError, DecodeOptions, decode_with};
use crate::term::Term;

/// Decode every buffer in `records`, one result per buffer.
#[cfg(feature = "parallel")]
pub fn decode_batch<B>(records: &[B], opts: &DecodeOptions) -> Vec<Result<Term, DecodeError>>
where
    B: AsRef<[u8]> + Sync,
{
    use rayon::prelude::*;

    records
        .par_iter()
        .map(|r| decode_with(r.as_ref(), opts))
        .collect()
}

/// Decode every buffer in `records`, one result per buffer.
#[cfg(not(feature = "parallel"))]
pub fn decode_batch<B>(records: &[B], opts: &DecodeOptions) -> Vec<Result<Term, DecodeError>>
where
    B: AsRef<[u8]> + Sync,
{
    records
        .iter()
        .map(|r| decode_with(r.as_ref(), opts))
        .collect()
}

/// Like [`decode_batch`], stopping at the first failure.
pub fn try_decode_batch<B>(records: &[B], opts: &DecodeOptions) -> Result<Vec<Term>, DecodeError>
where
    B: AsRef<[u8]> + Sync,
{
    decode_batch(records, opts).into_iter().collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn results_keep_input_order() {
        let records: Vec<Vec<u8>> = (0u8..=200).map(|v| vec![131, 97, v]).collect();
        let results = decode_batch(&records, &DecodeOptions::default());
        assert_eq!(results.len(), records.len());
        for (v, r) in results.into_iter().enumerate() {
            assert_eq!(r.unwrap(), Term::Int64(v as i64));
        }
    }

    #[test]
    fn failures_stay_per_record() {
        let records: [&[u8]; 3] = [&[131, 97, 1], &[131, 98, 0], &[131, 106]];
        let results = decode_batch(&records, &DecodeOptions::default());
        assert!(results[0].is_ok());
        assert!(matches!(results[1], Err(DecodeError::EndOfInput)));
        assert_eq!(results[2].as_ref().unwrap(), &Term::Nil);

        assert!(try_decode_batch(&records, &DecodeOptions::default()).is_err());
        assert_eq!(
            try_decode_batch(&[records[0], records[2]], &DecodeOptions::default()).unwrap(),
            vec![Term::Int64(1), Term::Nil]
        );
    }
}
