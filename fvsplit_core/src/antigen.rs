// Copyright (c) 2022 Fvsplit Authors. All rights reserved.

// Antigen detection.  Three passes over the structure, in order:
// 1. protein/nucleic antigen chains contacting the CDRs of an Fv unit;
// 2. het antigen chains (haptens living in their own HETATM chains);
// 3. het antigen residues embedded in polymer chains (e.g. glycans).
//
// A VH/VL pair is treated as one unit for pass 1: the contact count is
// shared and a flagged chain is recorded on both domains.  Chains whose
// sequence is nearly identical to a detected domain are crystallographic
// copies of the antibody, not antigens, and are skipped.

use crate::align::identity_fraction;
use crate::defs::*;
use crate::pdb::*;
use vector_utils::*;

// Any atom of r1 within contact range of any atom of r2.

fn residues_make_contact(r1: &Residue, r2: &Residue) -> bool {
    for a1 in &r1.atoms {
        for a2 in &r2.atoms {
            if dist_sq(&a1.coords(), &a2.coords()) < CONTACT_DIST_SQ {
                return true;
            }
        }
    }
    false
}

// Count CDR-residue contacts between the unit's domains and one candidate
// chain, stopping as soon as the threshold is reached.

fn unit_contacts_chain(structure: &Structure, domains: &[Domain], unit: &[usize], ci: usize) -> bool {
    let mut n_contacts = 0;
    for &di in unit {
        let d = &domains[di];
        let chain = &structure.chains[d.chain];
        let (start_res, stop_res) = match (d.start_res, d.stop_res) {
            (Some(a), Some(b)) => (a, b),
            _ => continue,
        };
        let positions = chain.standard_positions();
        for ri in start_res..stop_res {
            let sp = match positions[ri] {
                Some(p) => p,
                None => continue,
            };
            if !bin_member(&d.cdr_res, &sp) {
                continue;
            }
            for res2 in &structure.chains[ci].residues {
                if residues_make_contact(&chain.residues[ri], res2) {
                    n_contacts += 1;
                    if n_contacts >= MIN_AG_CONTACTS {
                        return true;
                    }
                }
            }
        }
    }
    false
}

// Flag protein and nucleic antigen chains.  Returns true if any unit was
// assigned an antigen.

pub fn flag_protein_antigens(
    domains: &mut Vec<Domain>,
    structure: &Structure,
    opts: &RunOpts,
) -> bool {
    if !opts.quiet {
        println!("\n***Looking for non-het antigens");
    }
    let mut found_antigen = false;
    for d in domains.iter_mut() {
        d.used = false;
    }
    for i in 0..domains.len() {
        if domains[i].used {
            continue;
        }
        domains[i].used = true;
        let mut unit = vec![i];
        if let Some(j) = domains[i].paired {
            domains[j].used = true;
            unit.push(j);
        }
        for &di in &unit {
            domains[di].antigen_chains.clear();
        }
        let mut hits = Vec::<usize>::new();
        'chains: for ci in 0..structure.chains.len() {
            let chain = &structure.chains[ci];
            if chain.chain_type == ChainType::Het {
                continue;
            }
            if unit.iter().any(|&di| domains[di].chain == ci) {
                continue;
            }
            // Crystallographic copy of an antibody chain?
            let full = full_sequence(chain);
            for &di in &unit {
                if identity_fraction(&full, &domains[di].dom_seq) >= XTAL_IDENTITY {
                    if !opts.quiet {
                        println!(
                            "Crystal packing: Chain {} = Domain {} (chain {})",
                            chain.label,
                            domains[di].domain_number,
                            structure.chains[domains[di].chain].label,
                        );
                    }
                    continue 'chains;
                }
            }
            if unit_contacts_chain(structure, domains, &unit, ci) {
                hits.push(ci);
            }
        }
        for ci in hits {
            found_antigen = true;
            for &di in &unit {
                domains[di].antigen_chains.push(ci);
            }
        }
    }
    found_antigen
}

// Does any atom of the het residue touch a CDR residue of the domain?

fn het_residue_contacts_domain(structure: &Structure, d: &Domain, res: &Residue) -> bool {
    let chain = &structure.chains[d.chain];
    let (start_res, stop_res) = match (d.start_res, d.stop_res) {
        (Some(a), Some(b)) => (a, b),
        _ => return false,
    };
    let positions = chain.standard_positions();
    for ri in start_res..stop_res {
        let sp = match positions[ri] {
            Some(p) => p,
            None => continue,
        };
        if !bin_member(&d.cdr_res, &sp) {
            continue;
        }
        if residues_make_contact(res, &chain.residues[ri]) {
            return true;
        }
    }
    false
}

// Flag hapten groups that live in their own HETATM chains.

pub fn flag_het_antigen_chains(domains: &mut Vec<Domain>, structure: &Structure, opts: &RunOpts) {
    if !opts.quiet {
        println!("\n***Looking for HET antigen chains");
    }
    for ci in 0..structure.chains.len() {
        let chain = &structure.chains[ci];
        if chain.chain_type != ChainType::Het {
            continue;
        }
        for ri in 0..chain.residues.len() {
            let res = &chain.residues[ri];
            if res.is_water() || res.atoms.len() < MIN_HET_ATOMS {
                continue;
            }
            for d in domains.iter_mut() {
                if het_residue_contacts_domain(structure, d, res) {
                    if !opts.quiet {
                        println!(
                            "HET group {}{} contacts Domain {}",
                            chain.label,
                            res.resid(),
                            d.domain_number,
                        );
                    }
                    d.het_antigen.push((ci, ri));
                }
            }
        }
    }
}

// Flag hapten groups embedded in polymer chains.

pub fn flag_het_antigen_residues(domains: &mut Vec<Domain>, structure: &Structure, opts: &RunOpts) {
    if !opts.quiet {
        println!("\n***Looking for HET antigen residues");
    }
    for ci in 0..structure.chains.len() {
        let chain = &structure.chains[ci];
        if chain.chain_type == ChainType::Het {
            continue;
        }
        for ri in 0..chain.residues.len() {
            let res = &chain.residues[ri];
            if res.is_water() || !is_non_peptide_het(structure, res) {
                continue;
            }
            for d in domains.iter_mut() {
                if het_residue_contacts_domain(structure, d, res) {
                    if !opts.quiet {
                        println!(
                            "HET group {}{} contacts Domain {}",
                            chain.label,
                            res.resid(),
                            d.domain_number,
                        );
                    }
                    d.het_antigen.push((ci, ri));
                }
            }
        }
    }
}
