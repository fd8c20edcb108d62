// Copyright (c) 2022 Fvsplit Authors. All rights reserved.

// Resolve a domain's sequence-position range into residue records and
// compute its two centers of mass: all CA atoms, and the CA atoms of the
// VH/VL interface residues.  A domain with no CA atoms keeps None centers
// and is thereby excluded from pairing.

use crate::defs::Domain;
use crate::pdb::Chain;
use vector_utils::*;

fn mean_coords(sum: [f64; 3], n: usize) -> Option<[f64; 3]> {
    if n == 0 {
        return None;
    }
    Some([sum[0] / n as f64, sum[1] / n as f64, sum[2] / n as f64])
}

pub fn set_domain_boundaries(d: &mut Domain, chain: &Chain) {
    let (start, last) = match (d.start_seq_res, d.last_seq_res) {
        (Some(s), Some(l)) => (s, l),
        _ => return,
    };
    let positions = chain.standard_positions();

    // Locate the residue records for the sequence positions.

    for i in 0..chain.residues.len() {
        if positions[i] == Some(start) {
            d.start_res = Some(i);
        }
        if positions[i] == Some(last) {
            d.stop_res = Some(i + 1);
            break;
        }
    }
    let (start_res, stop_res) = match (d.start_res, d.stop_res) {
        (Some(a), Some(b)) => (a, b),
        _ => return,
    };

    // Whole-domain center of mass over CA atoms.

    let mut sum = [0.0; 3];
    let mut n = 0;
    for i in start_res..stop_res {
        for atom in &chain.residues[i].atoms {
            if atom.name() == "CA" {
                sum[0] += atom.x;
                sum[1] += atom.y;
                sum[2] += atom.z;
                n += 1;
            }
        }
    }
    d.cofg = mean_coords(sum, n);

    // Interface center of mass.

    let mut sum = [0.0; 3];
    let mut n = 0;
    for i in start_res..stop_res {
        let sp = match positions[i] {
            Some(p) => p,
            None => continue,
        };
        if !bin_member(&d.interface, &sp) {
            continue;
        }
        for atom in &chain.residues[i].atoms {
            if atom.name() == "CA" {
                sum[0] += atom.x;
                sum[1] += atom.y;
                sum[2] += atom.z;
                n += 1;
            }
        }
    }
    d.int_cofg = mean_coords(sum, n);
}
