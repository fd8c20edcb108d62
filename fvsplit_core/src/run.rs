// Copyright (c) 2022 Fvsplit Authors. All rights reserved.

// Top-level pipeline: classify chains, find variable domains on every
// protein chain, pair them, flag antigens, report, and write one output
// file per Fv unit.

use crate::antigen::*;
use crate::defs::*;
use crate::extract::find_domains;
use crate::pair::pair_domains;
use crate::pdb::*;
use crate::refdata::RefEntry;
use crate::write::write_domains;
use string_utils::*;

// Output file stem: the input path with any directory part and any
// extension removed.

pub fn file_stem(path: &str) -> String {
    let tail = if path.contains('/') {
        path.rev_after("/")
    } else {
        path
    };
    if tail.contains('.') {
        tail.rev_before(".").to_string()
    } else {
        tail.to_string()
    }
}

fn print_domains(structure: &Structure, domains: &[Domain]) {
    println!("\n***Results");
    for d in domains {
        let (pair_num, pair_chain) = match d.paired {
            Some(j) => (
                domains[j].domain_number,
                structure.chains[domains[j].chain].label.as_str(),
            ),
            None => (0, "none"),
        };
        println!(
            "Domain: {} Chain: {} Start: {} Stop: {} Type: {} PairsWithDomain: {} (Chain: {})",
            d.domain_number,
            structure.chains[d.chain].label,
            d.start_seq_res.map_or(-1, |p| p as i64),
            d.last_seq_res.map_or(-1, |p| p as i64),
            d.chain_type as char,
            pair_num,
            pair_chain,
        );
        println!("{}", strme(&d.dom_seq));
        if !d.antigen_chains.is_empty() {
            print!("   AntigenChains: ");
            for &ci in &d.antigen_chains {
                print!("{} ", structure.chains[ci].label);
            }
            println!();
        }
        println!();
    }
}

pub fn process_structure(
    structure: &mut Structure,
    refdata: &[RefEntry],
    opts: &RunOpts,
) -> Result<(), String> {
    let filestem = file_stem(&opts.input_path);
    classify_chains(structure);

    let mut domains = Vec::<Domain>::new();
    for ci in 0..structure.chains.len() {
        if structure.chains[ci].chain_type != ChainType::Protein {
            continue;
        }
        if !opts.quiet {
            println!("\n***Handling chain: {}", structure.chains[ci].label);
        }
        find_domains(structure, ci, refdata, &mut domains, opts);
    }
    if domains.is_empty() {
        return Err(format!(
            "\nNo antibody domains found in {}.\n",
            opts.input_path
        ));
    }

    pair_domains(&mut domains);
    flag_protein_antigens(&mut domains, structure, opts);
    flag_het_antigen_chains(&mut domains, structure, opts);
    flag_het_antigen_residues(&mut domains, structure, opts);

    if !opts.quiet {
        print_domains(structure, &domains);
    }
    write_domains(structure, &mut domains, &filestem, opts)
}
