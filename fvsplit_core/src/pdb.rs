// Copyright (c) 2022 Fvsplit Authors. All rights reserved.

// Tools to work with PDB files: a small structure model, fixed-column
// ATOM/HETATM parsing, and record writing.
//
// Waters are dropped at load.  Atoms are grouped by chain label (order of
// first appearance), then into residues on change of (resnum, insert,
// resname).  SEQRES, MODRES and HETNAM header records are retained verbatim
// for the output assembler and the ion check.

use crate::defs::MIN_HET_ATOMS;
use amino::*;
use io_utils::*;
use std::fs::File;
use std::io::{BufRead, BufReader};

pub const BACKBONE_ATOMS: [&str; 7] = ["N", "CA", "C", "O", "P", "OP1", "OP2"];

const WATERS: [&str; 8] = ["HOH", "DOD", "WAT", "H2O", "D2O", "OH2", "OD2", "ODD"];

const NUCLEOTIDES: [&str; 8] = ["U", "A", "C", "G", "DT", "DA", "DC", "DG"];

const AA3: [&str; 20] = [
    "ALA", "ARG", "ASN", "ASP", "CYS", "GLN", "GLU", "GLY", "HIS", "ILE", "LEU", "LYS", "MET",
    "PHE", "PRO", "SER", "THR", "TRP", "TYR", "VAL",
];

#[derive(Clone, Copy, PartialEq)]
pub enum ChainType {
    Protein,
    Nucleic,
    Het,
}

#[derive(Clone)]
pub struct Atom {
    pub het: bool,          // HETATM rather than ATOM record
    pub serial: usize,      // atom serial number
    pub name_field: String, // four-column atom name field, e.g. " CA "
    pub alt: char,          // alternate location indicator
    pub res_name: String,   // residue name, trimmed
    pub res_num: i32,       // residue sequence number
    pub insert: char,       // insertion code
    pub x: f64,
    pub y: f64,
    pub z: f64,
    pub tail: String, // occupancy column onward, written back verbatim
}

impl Atom {
    pub fn name(&self) -> &str {
        self.name_field.trim()
    }

    pub fn coords(&self) -> [f64; 3] {
        [self.x, self.y, self.z]
    }
}

#[derive(Clone)]
pub struct Residue {
    pub res_name: String,
    pub res_num: i32,
    pub insert: char,
    pub atoms: Vec<Atom>,
}

impl Residue {
    pub fn resid(&self) -> String {
        let mut s = format!("{}", self.res_num);
        if self.insert != ' ' {
            s.push(self.insert);
        }
        s
    }

    pub fn is_water(&self) -> bool {
        WATERS.contains(&self.res_name.as_str())
    }
}

#[derive(Clone)]
pub struct Chain {
    pub label: String,
    pub chain_type: ChainType,
    pub residues: Vec<Residue>,
}

impl Chain {
    // Map residue index to its 0-based position among the chain's standard
    // residues.  This is the structure-local numbering used for domain
    // boundaries, CDR and interface sets throughout.

    pub fn standard_positions(&self) -> Vec<Option<usize>> {
        let mut positions = vec![None; self.residues.len()];
        let mut seq_pos = 0;
        for i in 0..self.residues.len() {
            if is_standard_residue(&self.residues[i]) {
                positions[i] = Some(seq_pos);
                seq_pos += 1;
            }
        }
        positions
    }
}

pub struct Structure {
    pub chains: Vec<Chain>,
    pub header: Vec<String>, // SEQRES, MODRES and HETNAM records
}

impl Structure {
    pub fn chain_index(&self, label: &str) -> Option<usize> {
        for i in 0..self.chains.len() {
            if self.chains[i].label == label {
                return Some(i);
            }
        }
        None
    }
}

// A residue is standard polymer if it has an ATOM-kind atom, or at least
// three backbone atoms among its HETATM atoms (covers MODRES-style modified
// residues given only as HETATM).

pub fn is_standard_residue(res: &Residue) -> bool {
    let mut has_backbone = 0;
    for atom in &res.atoms {
        if !atom.het {
            return true;
        }
        if BACKBONE_ATOMS.contains(&atom.name()) {
            has_backbone += 1;
        }
    }
    has_backbone >= 3
}

// A het group qualifying as a candidate hapten inside a polymer chain: all
// atoms HETATM-kind, no peptide/nucleic backbone, at least MIN_HET_ATOMS
// atoms, and not named as an ion by a HETNAM header record.

pub fn is_non_peptide_het(structure: &Structure, res: &Residue) -> bool {
    let mut has_backbone = 0;
    for atom in &res.atoms {
        if !atom.het {
            return false;
        }
        if BACKBONE_ATOMS.contains(&atom.name()) {
            has_backbone += 1;
        }
    }
    if has_backbone >= 3 || res.atoms.len() < MIN_HET_ATOMS {
        return false;
    }
    for h in &structure.header {
        if h.starts_with("HETNAM") {
            // HETNAM residue name lives in columns 12-14.  get() so a
            // malformed record with multibyte text there cannot panic.
            if let Some(name) = h.get(11..14) {
                if name.trim() == res.res_name && h.contains(" ION") {
                    return false;
                }
            }
        }
    }
    true
}

pub fn three_to_one(res_name: &str) -> u8 {
    if AA3.contains(&res_name) {
        aa3_to_aa(res_name.as_bytes())
    } else {
        b'X'
    }
}

// One-letter sequence over the standard residues of a polymer chain.  This is
// the sequence the extractor masks; its positions are the structure-local
// numbering.

pub fn sequence_for_chain(chain: &Chain) -> Vec<u8> {
    let mut seq = Vec::<u8>::new();
    if chain.chain_type == ChainType::Het {
        return seq;
    }
    for res in &chain.residues {
        if is_standard_residue(res) {
            seq.push(three_to_one(&res.res_name));
        }
    }
    seq
}

// One-letter sequence over all residues, used for the crystal-packing check.

pub fn full_sequence(chain: &Chain) -> Vec<u8> {
    let mut seq = Vec::<u8>::new();
    for res in &chain.residues {
        seq.push(three_to_one(&res.res_name));
    }
    seq
}

// Tag each chain as protein, nucleic or het from its first ATOM-kind atom.

pub fn classify_chains(structure: &mut Structure) {
    for chain in structure.chains.iter_mut() {
        chain.chain_type = ChainType::Het;
        'chain: for res in &chain.residues {
            for atom in &res.atoms {
                if !atom.het {
                    chain.chain_type = if NUCLEOTIDES.contains(&res.res_name.as_str()) {
                        ChainType::Nucleic
                    } else {
                        ChainType::Protein
                    };
                    break 'chain;
                }
            }
        }
    }
}

fn parse_atom_record(s: &str) -> Option<Atom> {
    if s.len() < 54 {
        return None;
    }
    let het = s.starts_with("HETATM");
    let serial = s[6..11].trim().parse::<usize>().unwrap_or(0);
    let name_field = s[12..16].to_string();
    let alt = s.as_bytes()[16] as char;
    let res_name = s[17..20].trim().to_string();
    let res_num = s[22..26].trim().parse::<i32>().unwrap_or(0);
    let insert = s.as_bytes()[26] as char;
    let x = s[30..38].trim().parse::<f64>().ok()?;
    let y = s[38..46].trim().parse::<f64>().ok()?;
    let z = s[46..54].trim().parse::<f64>().ok()?;
    let tail = if s.len() > 54 {
        s[54..].to_string()
    } else {
        String::new()
    };
    Some(Atom {
        het,
        serial,
        name_field,
        alt,
        res_name,
        res_num,
        insert,
        x,
        y,
        z,
        tail,
    })
}

// Parse PDB lines into a structure, dropping waters.

pub fn parse_structure(lines: &[String]) -> Structure {
    let mut chains = Vec::<Chain>::new();
    let mut header = Vec::<String>::new();
    for s in lines {
        if s.starts_with("ATOM  ") || s.starts_with("HETATM") {
            let chain_label = if s.len() >= 22 {
                s[21..22].to_string()
            } else {
                continue;
            };
            let atom = match parse_atom_record(s) {
                Some(a) => a,
                None => continue,
            };
            if WATERS.contains(&atom.res_name.as_str()) {
                continue;
            }
            let ci = match chains.iter().position(|c| c.label == chain_label) {
                Some(ci) => ci,
                None => {
                    chains.push(Chain {
                        label: chain_label,
                        chain_type: ChainType::Het,
                        residues: Vec::new(),
                    });
                    chains.len() - 1
                }
            };
            let chain = &mut chains[ci];
            let new_res = match chain.residues.last() {
                Some(r) => {
                    r.res_num != atom.res_num || r.insert != atom.insert || r.res_name != atom.res_name
                }
                None => true,
            };
            if new_res {
                chain.residues.push(Residue {
                    res_name: atom.res_name.clone(),
                    res_num: atom.res_num,
                    insert: atom.insert,
                    atoms: Vec::new(),
                });
            }
            match chain.residues.last_mut() {
                Some(r) => r.atoms.push(atom),
                None => {}
            }
        } else if s.starts_with("SEQRES") || s.starts_with("MODRES") || s.starts_with("HETNAM") {
            header.push(s.clone());
        }
    }
    Structure { chains, header }
}

pub fn read_structure(path: &str) -> Result<Structure, String> {
    if !path_exists(path) {
        return Err(format!("\nCan't read input file {}.\n", path));
    }
    let mut lines = Vec::<String>::new();
    let f = open_for_read![&path];
    for line in f.lines() {
        let s = line.unwrap();
        lines.push(s);
    }
    let structure = parse_structure(&lines);
    if structure.chains.is_empty() {
        return Err(format!("\nNothing read from input file {}.\n", path));
    }
    Ok(structure)
}

// Format one atom back into a fixed-column record, substituting the chain
// label.

pub fn format_atom_record(atom: &Atom, chain_label: &str) -> String {
    format!(
        "{}{:5} {}{}{:>3} {}{:4}{}   {:8.3}{:8.3}{:8.3}{}",
        if atom.het { "HETATM" } else { "ATOM  " },
        atom.serial,
        atom.name_field,
        atom.alt,
        atom.res_name,
        chain_label,
        atom.res_num,
        atom.insert,
        atom.x,
        atom.y,
        atom.z,
        atom.tail,
    )
}
