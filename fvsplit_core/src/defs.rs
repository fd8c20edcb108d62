// Copyright (c) 2022 Fvsplit Authors. All rights reserved.

// Heuristic constants, the run configuration, and the domain record that the
// whole pipeline operates on.

// Minimum similarity fraction for a reference match to count as a domain.
pub const AB_THRESHOLD: f64 = 0.45;

// Affine gap penalties for the BLOSUM62 alignment (positive; negated at the
// aligner).
pub const GAP_OPEN_PENALTY: i32 = 5;
pub const GAP_EXT_PENALTY: i32 = 2;

// Sequences with fewer real residues than this are never searched.
pub const MIN_SEQ_LEN: usize = 50;

// 35^2 - center-of-mass cutoff for possible VH/VL pairs.
pub const COFG_DIST_CUT_SQ: f64 = 1225.0;

// 20^2 - interface center cutoff for VH/VL contact.
pub const INT_DIST_CUT_SQ: f64 = 400.0;

// 6^2 - atom-atom cutoff for antigen contacts.
pub const CONTACT_DIST_SQ: f64 = 36.0;

// Residue-pair contacts needed to call a chain an antigen.  Tuned together
// with CONTACT_DIST_SQ: low enough to catch real antigens, high enough that
// most crystal-packing neighbors fall below it.
pub const MIN_AG_CONTACTS: usize = 14;

// Het residues smaller than this are ignored as candidate haptens.
pub const MIN_HET_ATOMS: usize = 8;

// Identity fraction at which a candidate chain is treated as a
// crystallographic copy of the antibody rather than an antigen.
pub const XTAL_IDENTITY: f64 = 0.98;

// Run configuration, built once by the CLI and passed by reference.

#[derive(Default)]
pub struct RunOpts {
    pub verbose: bool,
    pub quiet: bool,
    pub no_antigen: bool,
    pub refdata_path: String,
    pub input_path: String,
}

// One detected Fv domain.  All cross-references are indices: chain into
// Structure::chains, paired into the domain arena, antigen_chains into
// Structure::chains, het_antigen as (chain, residue).
//
// Sequence positions (start_seq_res, last_seq_res, interface, cdr_res) are
// 0-based indices among the standard residues of the owning chain; see
// Chain::standard_positions.

pub struct Domain {
    pub domain_number: usize,
    pub chain: usize,
    pub chain_type: u8,
    pub start_seq_res: Option<usize>,
    pub last_seq_res: Option<usize>,
    pub dom_seq: Vec<u8>,
    pub interface: Vec<usize>,
    pub cdr_res: Vec<usize>,
    pub start_res: Option<usize>,
    pub stop_res: Option<usize>,
    pub cofg: Option<[f64; 3]>,
    pub int_cofg: Option<[f64; 3]>,
    pub paired: Option<usize>,
    pub pair_cofg_dist_sq: f64,
    pub pair_int_dist_sq: f64,
    pub antigen_chains: Vec<usize>,
    pub het_antigen: Vec<(usize, usize)>,
    pub used: bool,
}

impl Domain {
    pub fn new(domain_number: usize, chain: usize) -> Self {
        Domain {
            domain_number,
            chain,
            chain_type: b'?',
            start_seq_res: None,
            last_seq_res: None,
            dom_seq: Vec::new(),
            interface: Vec::new(),
            cdr_res: Vec::new(),
            start_res: None,
            stop_res: None,
            cofg: None,
            int_cofg: None,
            paired: None,
            pair_cofg_dist_sq: 1.0e8,
            pair_int_dist_sq: 1.0e8,
            antigen_chains: Vec::new(),
            het_antigen: Vec::new(),
            used: false,
        }
    }
}

pub fn dist_sq(a: &[f64; 3], b: &[f64; 3]) -> f64 {
    let (dx, dy, dz) = (a[0] - b[0], a[1] - b[1], a[2] - b[2]);
    dx * dx + dy * dy + dz * dz
}
