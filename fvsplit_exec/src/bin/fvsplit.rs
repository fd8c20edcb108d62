// Copyright (c) 2022 Fvsplit Authors. All rights reserved.

// Split an antibody PDB file into its Fv units.
//
// fvsplit [-v] [-q] [-n] [-d refdata.faa] input.pdb
//
// Each detected VH/VL unit is written to <stem>_<n><flags>.pdb in the
// current directory, where <flags> marks protein (P), nucleic (N) and
// het (H) antigens found in contact with the unit's CDRs.

use fvsplit_core::defs::RunOpts;
use fvsplit_core::pdb::read_structure;
use fvsplit_core::refdata::read_ref_data;
use fvsplit_core::run::process_structure;
use pretty_trace::*;
use std::env;
use std::process::exit;

fn usage_die() -> ! {
    println!("\nfvsplit V1.0\n");
    println!("Usage: fvsplit [-v] [-q] [-n] [-d refdata.faa] input.pdb");
    println!("       -v  report alignments and scores on stderr");
    println!("       -q  suppress progress and results output");
    println!("       -n  do not write antigens to the output files");
    println!("       -d  reference Fv sequence file (default: fvsplit.faa");
    println!("           next to the executable)");
    println!();
    println!("Identifies antibody variable domains in a PDB file by");
    println!("sequence similarity to a reference set, pairs VH with VL");
    println!("domains by their centers of mass, finds protein, nucleic");
    println!("and hapten antigens in contact with the CDRs, and writes");
    println!("one PDB file per Fv unit.");
    exit(1);
}

fn default_refdata_path() -> String {
    if let Ok(exe) = env::current_exe() {
        if let Some(dir) = exe.parent() {
            return format!("{}/fvsplit.faa", dir.display());
        }
    }
    "fvsplit.faa".to_string()
}

fn main() {
    PrettyTrace::new().on();
    let args: Vec<String> = env::args().collect();
    let mut opts = RunOpts::default();
    opts.refdata_path = default_refdata_path();
    let mut i = 1;
    while i < args.len() {
        match args[i].as_str() {
            "-v" => {
                opts.verbose = true;
                opts.quiet = false;
            }
            "-q" => {
                opts.quiet = true;
                opts.verbose = false;
            }
            "-n" => {
                opts.no_antigen = true;
            }
            "-d" => {
                i += 1;
                if i >= args.len() {
                    usage_die();
                }
                opts.refdata_path = args[i].clone();
            }
            "-h" | "--help" => {
                usage_die();
            }
            s => {
                if s.starts_with('-') || !opts.input_path.is_empty() {
                    usage_die();
                }
                opts.input_path = s.to_string();
            }
        }
        i += 1;
    }
    if opts.input_path.is_empty() {
        usage_die();
    }

    let refdata = match read_ref_data(&opts.refdata_path) {
        Ok(r) => r,
        Err(msg) => {
            eprintln!("{}", msg);
            exit(1);
        }
    };
    let mut structure = match read_structure(&opts.input_path) {
        Ok(s) => s,
        Err(msg) => {
            eprintln!("{}", msg);
            exit(1);
        }
    };
    if let Err(msg) = process_structure(&mut structure, &refdata, &opts) {
        eprintln!("{}", msg);
        exit(1);
    }
}
