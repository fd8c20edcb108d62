// Copyright (c) 2022 Fvsplit Authors. All rights reserved.

// Iterative match-and-mask extraction of antibody variable domains from a
// chain sequence.
//
// Each round scans the whole reference library for the best-scoring entry;
// a score above AB_THRESHOLD yields a domain, whose aligned residues are then
// overwritten with 'X' in the working sequence so the next round can find a
// further domain (scFv and other tandem constructs).  Extraction stops when
// the best score drops to the threshold or the working sequence runs out of
// real residues.

use crate::align::compare_seqs;
use crate::boundaries::set_domain_boundaries;
use crate::defs::*;
use crate::pdb::{sequence_for_chain, Structure};
use crate::refdata::{cdr_keys, chain_type_of, interface_keys, RefEntry};
use string_utils::*;

// Number of residues that are neither mask nor gap characters.

pub fn real_seq_len(seq: &[u8]) -> usize {
    let mut n = 0;
    for i in 0..seq.len() {
        if seq[i] != b'X' && seq[i] != b'-' {
            n += 1;
        }
    }
    n
}

// Translate reference-numbering key positions (1-based) into 0-based query
// sequence positions via the alignment.  Single pass over the columns: the
// reference counter includes the current column, and each non-gap query
// column is tested against the key list.

pub fn map_key_positions(aln_seq: &[u8], aln_ref: &[u8], keys: &[usize]) -> Vec<usize> {
    let mut positions = Vec::<usize>::new();
    let (mut seq_pos, mut ref_pos) = (0, 0);
    for col in 0..aln_seq.len() {
        if aln_ref[col] != b'-' {
            ref_pos += 1;
        }
        if aln_seq[col] != b'-' {
            seq_pos += 1;
            if keys.contains(&ref_pos) {
                positions.push(seq_pos - 1);
            }
        }
    }
    positions
}

// Build a domain from the winning alignment and mask its residues out of the
// working sequence.  Returns None if the alignment has no aligned columns, in
// which case nothing was masked and extraction must stop.

pub fn mask_and_assign(
    seq: &mut [u8],
    chain_idx: usize,
    entry: &RefEntry,
    aln_seq: &[u8],
    aln_ref: &[u8],
    domain_number: usize,
) -> Option<Domain> {
    let mut d = Domain::new(domain_number, chain_idx);
    d.chain_type = chain_type_of(&entry.header);
    d.interface = map_key_positions(aln_seq, aln_ref, &interface_keys(&entry.header));
    d.cdr_res = map_key_positions(aln_seq, aln_ref, &cdr_keys(&entry.header));
    let mut seq_pos = 0;
    for col in 0..aln_seq.len() {
        if aln_seq[col] != b'-' && aln_ref[col] != b'-' && seq_pos < seq.len() {
            if d.start_seq_res.is_none() {
                d.start_seq_res = Some(seq_pos);
            }
            d.last_seq_res = Some(seq_pos);
            d.dom_seq.push(seq[seq_pos]);
            seq[seq_pos] = b'X';
        }
        if aln_seq[col] != b'-' {
            seq_pos += 1;
        }
    }
    d.start_seq_res?;
    Some(d)
}

// One extraction round: find the best reference match for the working
// sequence and, if good enough, turn it into a domain.  Returns false when no
// further domain can be found in this chain.

fn check_and_mask(
    seq: &mut Vec<u8>,
    structure: &Structure,
    chain_idx: usize,
    refdata: &[RefEntry],
    domains: &mut Vec<Domain>,
    opts: &RunOpts,
) -> bool {
    if real_seq_len(seq) < MIN_SEQ_LEN {
        return false;
    }

    // Find the best match in the reference library.

    let mut max_score = 0.0_f64;
    let mut best = None;
    let (mut best_aln_seq, mut best_aln_ref) = (Vec::<u8>::new(), Vec::<u8>::new());
    for i in 0..refdata.len() {
        let (score, aln_seq, aln_ref) = compare_seqs(seq, &refdata[i].seq);
        if score > max_score {
            max_score = score;
            best = Some(i);
            best_aln_seq = aln_seq;
            best_aln_ref = aln_ref;
        }
    }
    let best = match best {
        Some(b) => b,
        None => return false,
    };
    if max_score <= AB_THRESHOLD {
        return false;
    }
    let entry = &refdata[best];
    if opts.verbose {
        eprintln!("Best match: {} Score: {:.4}", entry.header, max_score);
        eprintln!("SEQ: {}", strme(&best_aln_seq));
        eprintln!("REF: {}\n", strme(&best_aln_ref));
    }
    match mask_and_assign(
        seq,
        chain_idx,
        entry,
        &best_aln_seq,
        &best_aln_ref,
        domains.len() + 1,
    ) {
        Some(mut d) => {
            set_domain_boundaries(&mut d, &structure.chains[chain_idx]);
            if !opts.quiet {
                println!("Masked   : {}", strme(seq));
            }
            domains.push(d);
            true
        }
        None => false,
    }
}

// Extract all variable domains from one protein chain, appending to the
// domain arena.

pub fn find_domains(
    structure: &Structure,
    chain_idx: usize,
    refdata: &[RefEntry],
    domains: &mut Vec<Domain>,
    opts: &RunOpts,
) {
    let chain = &structure.chains[chain_idx];
    let mut seq = sequence_for_chain(chain);
    if !opts.quiet {
        println!("Chain: {} Sequence: {}", chain.label, strme(&seq));
    }
    loop {
        if !check_and_mask(&mut seq, structure, chain_idx, refdata, domains, opts) {
            break;
        }
    }
}
