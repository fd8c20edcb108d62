// Copyright (c) 2022 Fvsplit Authors. All rights reserved.

// Alignment services for domain detection: a length-normalized BLOSUM62
// similarity between a chain sequence and a reference sequence, and an
// identity fraction used for the crystal-packing check.

use crate::defs::*;
use bio::alignment::pairwise::Aligner;
use bio::alignment::{Alignment, AlignmentOperation};
use bio::scores::blosum62::blosum62;
use std::cmp::min;

// Rebuild the two gap-padded strings from a global alignment.

fn gapped_pair(al: &Alignment, x: &[u8], y: &[u8]) -> (Vec<u8>, Vec<u8>) {
    let (mut ax, mut ay) = (Vec::<u8>::new(), Vec::<u8>::new());
    let (mut i, mut j) = (al.xstart, al.ystart);
    for op in al.operations.iter() {
        match op {
            AlignmentOperation::Match | AlignmentOperation::Subst => {
                ax.push(x[i]);
                ay.push(y[j]);
                i += 1;
                j += 1;
            }
            AlignmentOperation::Ins => {
                ax.push(x[i]);
                ay.push(b'-');
                i += 1;
            }
            AlignmentOperation::Del => {
                ax.push(b'-');
                ay.push(y[j]);
                j += 1;
            }
            _ => {}
        }
    }
    (ax, ay)
}

// Best possible global alignment score of a sequence against itself.  For
// BLOSUM62 the gapless diagonal is optimal, so this is the diagonal sum.

fn self_score(s: &[u8]) -> i32 {
    let mut score = 0;
    for i in 0..s.len() {
        score += blosum62(s[i], s[i]);
    }
    score
}

// Compare a chain sequence against a reference sequence, returning the
// alignment score as a fraction of the best possible self-alignment score,
// plus the two gap-padded aligned strings.  The shorter of the two
// self-scores is the basis once the query is long enough to be a plausible
// domain, which stops short queries from scoring high against long
// references.

pub fn compare_seqs(query: &[u8], refseq: &[u8]) -> (f64, Vec<u8>, Vec<u8>) {
    let mut best_possible = self_score(refseq);
    if query.len() >= MIN_SEQ_LEN {
        best_possible = min(best_possible, self_score(query));
    }
    if best_possible <= 0 {
        return (0.0, Vec::new(), Vec::new());
    }
    let mut aligner = Aligner::with_capacity(
        query.len(),
        refseq.len(),
        -GAP_OPEN_PENALTY,
        -GAP_EXT_PENALTY,
        &blosum62,
    );
    let al = aligner.global(query, refseq);
    let (aln_query, aln_ref) = gapped_pair(&al, query, refseq);
    (al.score as f64 / best_possible as f64, aln_query, aln_ref)
}

// Fraction of aligned (non-gap against non-gap) columns whose residues are
// identical, under an identity-scored alignment.  Used to detect a candidate
// antigen chain that is really a crystallographic copy of the antibody.

pub fn identity_fraction(seq1: &[u8], seq2: &[u8]) -> f64 {
    if seq1.is_empty() || seq2.is_empty() {
        return 0.0;
    }
    let score = |a: u8, b: u8| if a == b { 1i32 } else { 0i32 };
    let mut aligner = Aligner::with_capacity(seq1.len(), seq2.len(), -2, -1, &score);
    let al = aligner.global(seq1, seq2);
    let (a1, a2) = gapped_pair(&al, seq1, seq2);
    let (mut aligned, mut matched) = (0, 0);
    for i in 0..a1.len() {
        if a1[i] != b'-' && a2[i] != b'-' {
            aligned += 1;
            if a1[i] == a2[i] {
                matched += 1;
            }
        }
    }
    if aligned == 0 {
        0.0
    } else {
        matched as f64 / aligned as f64
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_trace::*;

    const VDOM: &[u8] = b"EVQLVESGGGLVQPGGSLRLSCAASGFTFSSYAMSWVRQAPGKGLEWVSAISGSGGSTYY\
ADSVKGRFTISRDNSKNTLYLQMNSLRAEDTAVYYCAKDRLSITIRPRYYGLDVWGQGTTVTVSS";

    #[test]
    fn test_identical_sequences_score_one() {
        PrettyTrace::new().on();
        let (score, aln_q, aln_r) = compare_seqs(VDOM, VDOM);
        assert!((score - 1.0).abs() < 1.0e-12);
        assert_eq!(aln_q, VDOM.to_vec());
        assert_eq!(aln_r, VDOM.to_vec());
    }

    #[test]
    fn test_gapped_strings_same_length() {
        PrettyTrace::new().on();
        // Delete a stretch from the middle, forcing gaps.
        let mut shorter = VDOM[..40].to_vec();
        shorter.extend(&VDOM[60..]);
        let (score, aln_q, aln_r) = compare_seqs(&shorter, VDOM);
        assert_eq!(aln_q.len(), aln_r.len());
        assert!(score > AB_THRESHOLD);
        assert!(aln_q.contains(&b'-'));
        assert!(!aln_r.contains(&b'-'));
    }

    #[test]
    fn test_degenerate_basis_scores_zero() {
        PrettyTrace::new().on();
        // An all-X query at least MIN_SEQ_LEN long has a negative self-score,
        // so the basis is not positive and the comparison short-circuits.
        let masked = vec![b'X'; 120];
        let (score, aln_q, _) = compare_seqs(&masked, VDOM);
        assert_eq!(score, 0.0);
        assert!(aln_q.is_empty());
    }

    #[test]
    fn test_identity_fraction() {
        PrettyTrace::new().on();
        assert_eq!(identity_fraction(VDOM, VDOM), 1.0);
        let mut mutated = VDOM.to_vec();
        mutated[10] = if mutated[10] == b'A' { b'G' } else { b'A' };
        let f = identity_fraction(&mutated, VDOM);
        assert!(f < 1.0 && f > 0.98);
        assert_eq!(identity_fraction(b"", VDOM), 0.0);
    }
}
