// Copyright (c) 2022 Fvsplit Authors. All rights reserved.

// Assemble one PDB file per Fv unit: REMARK 950 relabeling table, MODRES
// and SEQRES header records, the domain (and partner) atoms under their
// standard labels, then antigen chains and het antigen residues.
//
// Antibody chains are relabeled to their type letter, with the second
// light or heavy chain of a unit dropped to lower case so dimers stay
// unambiguous.  Antigen chains keep their labels unless those collide with
// H or L, in which case they are lowercased.  Het antigen residues keep
// their original labels.

use crate::defs::*;
use crate::pdb::*;
use io_utils::*;
use std::fs::File;
use std::io::{BufWriter, Write};

// Relabeling for one antibody chain in the output file.

pub fn ab_chain_label(chain_type: u8, lower_light: &mut bool, lower_heavy: &mut bool) -> char {
    let mut label = chain_type as char;
    if label == 'L' {
        if *lower_light {
            label = 'l';
        }
        *lower_light = true;
    } else if label == 'H' {
        if *lower_heavy {
            label = 'h';
        }
        *lower_heavy = true;
    }
    label
}

pub fn antigen_chain_label(label: &str) -> String {
    if label == "L" || label == "H" {
        label.to_lowercase()
    } else {
        label.to_string()
    }
}

// Complex suffix for the output file name: P for a protein antigen chain,
// N for a nucleic one, H for het antigens on either domain of the unit.

pub fn complex_flags(structure: &Structure, domains: &[Domain], unit: &[usize]) -> String {
    let mut complex = String::new();
    let lead = &domains[unit[0]];
    if lead
        .antigen_chains
        .iter()
        .any(|&ci| structure.chains[ci].chain_type == ChainType::Protein)
    {
        complex.push('P');
    }
    if lead
        .antigen_chains
        .iter()
        .any(|&ci| structure.chains[ci].chain_type == ChainType::Nucleic)
    {
        complex.push('N');
    }
    if unit.iter().any(|&di| !domains[di].het_antigen.is_empty()) {
        complex.push('H');
    }
    complex
}

fn seqres_for_chain(f: &mut impl Write, structure: &Structure, orig: &str, new_label: char) {
    for h in &structure.header {
        if h.starts_with("SEQRES") && h.as_bytes().get(11) == orig.as_bytes().first() {
            let mut rec = h.clone().into_bytes();
            rec[11] = new_label as u8;
            fwriteln!(f, "{}", String::from_utf8(rec).unwrap());
        }
    }
}

fn write_domain_atoms(f: &mut impl Write, structure: &Structure, d: &Domain, label: char) {
    let chain = &structure.chains[d.chain];
    let (start_res, stop_res) = match (d.start_res, d.stop_res) {
        (Some(a), Some(b)) => (a, b),
        _ => return,
    };
    for ri in start_res..stop_res {
        for atom in &chain.residues[ri].atoms {
            fwriteln!(f, "{}", format_atom_record(atom, &label.to_string()));
        }
    }
    fwriteln!(f, "TER   ");
}

// Write one file per unpaired domain or VH/VL pair.

pub fn write_domains(
    structure: &Structure,
    domains: &mut Vec<Domain>,
    filestem: &str,
    opts: &RunOpts,
) -> Result<(), String> {
    let mut dom_count = 0;
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

        let complex = complex_flags(structure, domains, &unit);
        let outfile = format!("{}_{}{}.pdb", filestem, dom_count, complex);
        dom_count += 1;
        let mut f = open_for_write_new![&outfile];

        // Relabeling table.

        let mut lower_light = false;
        let mut lower_heavy = false;
        let mut ab_labels = Vec::<char>::new();
        fwriteln!(f, "REMARK 950 CHAIN-TYPE  LABEL ORIGINAL");
        for &di in &unit {
            let d = &domains[di];
            let label = ab_chain_label(d.chain_type, &mut lower_light, &mut lower_heavy);
            ab_labels.push(label);
            fwriteln!(
                f,
                "REMARK 950 CHAIN {}     {}{:>6}",
                d.chain_type as char,
                label,
                structure.chains[d.chain].label,
            );
        }
        let mut ag_labels = Vec::<String>::new();
        for &ci in &domains[i].antigen_chains {
            let orig = &structure.chains[ci].label;
            let label = antigen_chain_label(orig);
            fwriteln!(f, "REMARK 950 CHAIN A{:>6}{:>6}", label, orig);
            ag_labels.push(label);
        }

        // MODRES records verbatim, then SEQRES with patched labels.

        for h in &structure.header {
            if h.starts_with("MODRES") {
                fwriteln!(f, "{}", h);
            }
        }
        for k in 0..unit.len() {
            let d = &domains[unit[k]];
            seqres_for_chain(&mut f, structure, &structure.chains[d.chain].label, ab_labels[k]);
        }
        for k in 0..domains[i].antigen_chains.len() {
            let ci = domains[i].antigen_chains[k];
            let orig = structure.chains[ci].label.clone();
            seqres_for_chain(&mut f, structure, &orig, ag_labels[k].chars().next().unwrap());
        }

        // Atoms: the unit's domains, then antigens.

        for k in 0..unit.len() {
            write_domain_atoms(&mut f, structure, &domains[unit[k]], ab_labels[k]);
        }

        if !opts.no_antigen {
            for k in 0..domains[i].antigen_chains.len() {
                let ci = domains[i].antigen_chains[k];
                for res in &structure.chains[ci].residues {
                    for atom in &res.atoms {
                        fwriteln!(f, "{}", format_atom_record(atom, &ag_labels[k]));
                    }
                }
                fwriteln!(f, "TER   ");
            }

            // Het antigen residues, deduplicated across the unit.

            let mut written = Vec::<(usize, usize)>::new();
            for &di in &unit {
                let mut wrote_any = false;
                for &(ci, ri) in &domains[di].het_antigen {
                    if written.contains(&(ci, ri)) {
                        continue;
                    }
                    written.push((ci, ri));
                    let chain = &structure.chains[ci];
                    let res = &chain.residues[ri];
                    if opts.verbose {
                        eprintln!(
                            "Writing domain {} HET residue {}{}",
                            domains[di].domain_number,
                            chain.label,
                            res.resid(),
                        );
                    }
                    for atom in &res.atoms {
                        fwriteln!(f, "{}", format_atom_record(atom, &chain.label));
                    }
                    wrote_any = true;
                }
                if wrote_any {
                    fwriteln!(f, "TER   ");
                }
            }
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pdb::{classify_chains, parse_structure};
    use pretty_trace::*;
    use std::fs;

    #[test]
    fn test_ab_chain_label_dimer_cases() {
        PrettyTrace::new().on();
        let (mut ll, mut lh) = (false, false);
        assert_eq!(ab_chain_label(b'H', &mut ll, &mut lh), 'H');
        assert_eq!(ab_chain_label(b'L', &mut ll, &mut lh), 'L');
        assert_eq!(ab_chain_label(b'H', &mut ll, &mut lh), 'h');
        assert_eq!(ab_chain_label(b'L', &mut ll, &mut lh), 'l');
        let (mut ll, mut lh) = (false, false);
        assert_eq!(ab_chain_label(b'?', &mut ll, &mut lh), '?');
        assert!(!ll && !lh);
    }

    #[test]
    fn test_antigen_chain_label() {
        PrettyTrace::new().on();
        assert_eq!(antigen_chain_label("A"), "A");
        assert_eq!(antigen_chain_label("H"), "h");
        assert_eq!(antigen_chain_label("L"), "l");
    }

    // An H/L pair on chains A/B, a protein antigen chain C, and an
    // eight-atom het group on chain D flagged by both domains.

    fn unit_structure() -> Structure {
        let mut lines = Vec::<String>::new();
        for i in 0..5 {
            lines.push(format!(
                "ATOM  {:5}  CA  ALA A{:4}    {:8.3}{:8.3}{:8.3}  1.00  0.00           C",
                i + 1,
                i + 1,
                8.0 * i as f64,
                0.0,
                0.0
            ));
        }
        for i in 0..5 {
            lines.push(format!(
                "ATOM  {:5}  CA  ALA B{:4}    {:8.3}{:8.3}{:8.3}  1.00  0.00           C",
                i + 20,
                i + 1,
                8.0 * i as f64,
                10.0,
                0.0
            ));
        }
        for i in 0..2 {
            lines.push(format!(
                "ATOM  {:5}  CA  GLY C{:4}    {:8.3}{:8.3}{:8.3}  1.00  0.00           C",
                i + 40,
                i + 1,
                8.0 * i as f64,
                5.0,
                0.0
            ));
        }
        for i in 0..8 {
            lines.push(format!(
                "HETATM{:5}  C{}  LIG D 501    {:8.3}{:8.3}{:8.3}  1.00  0.00           C",
                i + 50,
                i + 1,
                0.1 * i as f64,
                -5.0,
                0.0
            ));
        }
        lines.push("MODRES 1ABC MSE A    1  MET  SELENOMETHIONINE".to_string());
        lines.push("SEQRES   1 A    5  ALA ALA ALA ALA ALA".to_string());
        lines.push("SEQRES   1 B    5  ALA ALA ALA ALA ALA".to_string());
        lines.push("SEQRES   1 C    2  GLY GLY".to_string());
        let mut s = parse_structure(&lines);
        classify_chains(&mut s);
        s
    }

    fn unit_domains() -> Vec<Domain> {
        let mut d1 = Domain::new(1, 0);
        d1.chain_type = b'H';
        d1.start_res = Some(0);
        d1.stop_res = Some(5);
        d1.paired = Some(1);
        d1.antigen_chains = vec![2];
        d1.het_antigen = vec![(3, 0)];
        let mut d2 = Domain::new(2, 1);
        d2.chain_type = b'L';
        d2.start_res = Some(0);
        d2.stop_res = Some(5);
        d2.paired = Some(0);
        d2.antigen_chains = vec![2];
        d2.het_antigen = vec![(3, 0)];
        vec![d1, d2]
    }

    #[test]
    fn test_write_domains_file_contents() {
        PrettyTrace::new().on();
        let dir = std::env::temp_dir().join(format!("fvsplit_write_{}", std::process::id()));
        fs::create_dir_all(&dir).unwrap();
        let s = unit_structure();

        let stem = dir.join("unit").to_str().unwrap().to_string();
        let mut domains = unit_domains();
        let opts = RunOpts::default();
        write_domains(&s, &mut domains, &stem, &opts).unwrap();

        // Both antigen kinds present, so the suffix carries P and H.
        let outfile = format!("{}_0PH.pdb", stem);
        let text = fs::read_to_string(&outfile).unwrap();
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines[0], "REMARK 950 CHAIN-TYPE  LABEL ORIGINAL");
        assert_eq!(lines[1], "REMARK 950 CHAIN H     H     A");
        assert_eq!(lines[2], "REMARK 950 CHAIN L     L     B");
        assert_eq!(lines[3], "REMARK 950 CHAIN A     C     C");
        assert!(lines[4].starts_with("MODRES"));
        assert_eq!(lines[5], "SEQRES   1 H    5  ALA ALA ALA ALA ALA");
        assert_eq!(lines[6], "SEQRES   1 L    5  ALA ALA ALA ALA ALA");
        assert_eq!(lines[7], "SEQRES   1 C    2  GLY GLY");
        for i in 8..13 {
            assert!(lines[i].starts_with("ATOM") && lines[i].contains(" ALA H "));
        }
        assert_eq!(lines[13], "TER   ");
        for i in 14..19 {
            assert!(lines[i].starts_with("ATOM") && lines[i].contains(" ALA L "));
        }
        assert_eq!(lines[19], "TER   ");
        for i in 20..22 {
            assert!(lines[i].starts_with("ATOM") && lines[i].contains(" GLY C "));
        }
        assert_eq!(lines[22], "TER   ");
        // The het group was flagged by both domains but is written once.
        for i in 23..31 {
            assert!(lines[i].starts_with("HETATM") && lines[i].contains(" LIG D "));
        }
        assert_eq!(lines[31], "TER   ");
        assert_eq!(lines.len(), 32);

        // With antigen output suppressed, only the two antibody blocks are
        // written; the filename keeps its flags.
        let stem = dir.join("bare").to_str().unwrap().to_string();
        let mut domains = unit_domains();
        let opts = RunOpts {
            no_antigen: true,
            ..Default::default()
        };
        write_domains(&s, &mut domains, &stem, &opts).unwrap();
        let text = fs::read_to_string(format!("{}_0PH.pdb", stem)).unwrap();
        assert_eq!(text.lines().filter(|s| *s == "TER   ").count(), 2);
        assert!(!text.contains(" GLY C "));
        assert!(!text.contains(" LIG D "));

        let _ = fs::remove_dir_all(&dir);
    }

    #[test]
    fn test_complex_flags() {
        PrettyTrace::new().on();
        let chains = vec![
            Chain {
                label: "A".to_string(),
                chain_type: ChainType::Protein,
                residues: Vec::new(),
            },
            Chain {
                label: "B".to_string(),
                chain_type: ChainType::Protein,
                residues: Vec::new(),
            },
            Chain {
                label: "C".to_string(),
                chain_type: ChainType::Nucleic,
                residues: Vec::new(),
            },
        ];
        let structure = Structure {
            chains,
            header: Vec::new(),
        };
        let mut d1 = Domain::new(1, 0);
        let mut d2 = Domain::new(2, 0);
        d1.antigen_chains = vec![1, 2];
        d2.het_antigen = vec![(2, 0)];
        let domains = vec![d1, d2];
        // Protein and nucleic antigens on the lead, het on the partner.
        assert_eq!(complex_flags(&structure, &domains, &[0, 1]), "PNH");
        assert_eq!(complex_flags(&structure, &domains, &[0]), "PN");
        assert_eq!(complex_flags(&structure, &domains, &[1]), "H");
    }
}
