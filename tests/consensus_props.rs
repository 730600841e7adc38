//! Property tests for the majority-vote consensus builder.

use proptest::prelude::*;

use rad_pipeline::consensus::consensus;

/// Strategy: 1..=8 aligned sequences of a shared width over the loci
/// alphabet (bases, gap, unknown).
fn aligned_sequences() -> impl Strategy<Value = Vec<String>> {
    (0usize..16, 1usize..=8).prop_flat_map(|(width, count)| {
        let seq = proptest::collection::vec(
            proptest::sample::select(vec!['A', 'C', 'G', 'T', '-', 'N']),
            width,
        )
        .prop_map(|chars| chars.into_iter().collect::<String>());
        proptest::collection::vec(seq, count)
    })
}

proptest! {
    #[test]
    fn consensus_has_input_width(seqs in aligned_sequences()) {
        let cons = consensus(&seqs).unwrap();
        prop_assert_eq!(cons.len(), seqs[0].len());
    }

    #[test]
    fn consensus_is_order_independent(seqs in aligned_sequences()) {
        // The lexicographic tie-break makes this hold even with ties.
        let forward = consensus(&seqs).unwrap();
        let mut reversed = seqs.clone();
        reversed.reverse();
        prop_assert_eq!(forward, consensus(&reversed).unwrap());
    }

    #[test]
    fn consensus_never_emits_gap(seqs in aligned_sequences()) {
        let cons = consensus(&seqs).unwrap();
        prop_assert!(!cons.contains('-'));
    }

    #[test]
    fn single_sequence_is_unchanged_unless_masked(
        seq in proptest::collection::vec(
            proptest::sample::select(vec!['A', 'C', 'G', 'T']),
            0..16,
        ).prop_map(|chars| chars.into_iter().collect::<String>())
    ) {
        // A lone gap/unknown-free sequence is its own consensus.
        let cons = consensus(std::slice::from_ref(&seq)).unwrap();
        prop_assert_eq!(cons, seq);
    }
}
