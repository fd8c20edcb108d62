// Copyright (c) 2022 Fvsplit Authors. All rights reserved.

// The antibody reference library: a FASTA file of variable-domain sequences
// whose headers carry the chain type and two residue-index lists,
//
//     >NAME<T>|[i1,i2,...,iM|[c1,c2,...,cN]]
//
// where <T> is the single chain-type character immediately preceding the
// first '|' (H or L; anything else reads as unknown), the first '[' opens the
// VH/VL interface list (integers up to the embedded '|'), and the nested '['
// after that '|' opens the CDR list (integers up to the first ']').  Both
// lists are comma-separated decimal integers in reference-sequence numbering,
// 1-based, and may be empty or have a single entry.  Malformed headers yield
// empty lists and an unknown chain type.

use io_utils::*;
use std::fs::File;
use std::io::{BufRead, BufReader};

pub struct RefEntry {
    pub header: String,
    pub seq: Vec<u8>,
}

pub fn read_ref_data(path: &str) -> Result<Vec<RefEntry>, String> {
    if !path_exists(path) {
        return Err(format!(
            "\nThe antibody reference library {} was not found.\n",
            path
        ));
    }
    let mut entries = Vec::<RefEntry>::new();
    let f = open_for_read![&path];
    for line in f.lines() {
        let s = line.unwrap();
        if s.starts_with('>') {
            entries.push(RefEntry {
                header: s[1..].trim().to_string(),
                seq: Vec::new(),
            });
        } else if let Some(e) = entries.last_mut() {
            e.seq.append(&mut s.trim().as_bytes().to_vec());
        }
    }
    if entries.is_empty() {
        return Err(format!(
            "\nThe antibody reference library {} contains no sequences.\n",
            path
        ));
    }
    Ok(entries)
}

// Chain type is the character immediately preceding the first '|'.

pub fn chain_type_of(header: &str) -> u8 {
    match header.find('|') {
        Some(pos) if pos > 0 => {
            let c = header.as_bytes()[pos - 1];
            if c == b'H' || c == b'L' {
                c
            } else {
                b'?'
            }
        }
        _ => b'?',
    }
}

fn parse_int_list(list: &str, keys: &mut Vec<usize>) {
    for field in list.split(',') {
        if let Ok(n) = field.trim().parse::<usize>() {
            keys.push(n);
        }
    }
}

// Interface residue list: first '[' up to the embedded '|'.

pub fn interface_keys(header: &str) -> Vec<usize> {
    let mut keys = Vec::<usize>::new();
    if let Some(open) = header.find('[') {
        let body = &header[open + 1..];
        let list = match body.find('|') {
            Some(bar) => &body[..bar],
            None => match body.find(']') {
                Some(close) => &body[..close],
                None => body,
            },
        };
        parse_int_list(list, &mut keys);
    }
    keys
}

// CDR residue list: the nested '[' after the interface list, up to ']'.

pub fn cdr_keys(header: &str) -> Vec<usize> {
    let mut keys = Vec::<usize>::new();
    if let Some(open) = header.find('[') {
        let body = &header[open + 1..];
        if let Some(open2) = body.find('[') {
            let body = &body[open2 + 1..];
            let list = match body.find(']') {
                Some(close) => &body[..close],
                None => body,
            };
            parse_int_list(list, &mut keys);
        }
    }
    keys
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_trace::*;

    #[test]
    fn test_header_grammar() {
        PrettyTrace::new().on();
        let header = "HUMAN_VH_H|[35,37,39,44|[26,27,28,31]]";
        assert_eq!(chain_type_of(header), b'H');
        assert_eq!(interface_keys(header), vec![35, 37, 39, 44]);
        assert_eq!(cdr_keys(header), vec![26, 27, 28, 31]);

        let header = "MOUSE_VL_L|[36|[24]]";
        assert_eq!(chain_type_of(header), b'L');
        assert_eq!(interface_keys(header), vec![36]);
        assert_eq!(cdr_keys(header), vec![24]);
    }

    #[test]
    fn test_header_grammar_edge_cases() {
        PrettyTrace::new().on();
        // Empty lists.
        let header = "SOME_H|[|[]]";
        assert_eq!(chain_type_of(header), b'H');
        assert!(interface_keys(header).is_empty());
        assert!(cdr_keys(header).is_empty());

        // No annotation at all.
        let header = "PLAIN_HEADER";
        assert_eq!(chain_type_of(header), b'?');
        assert!(interface_keys(header).is_empty());
        assert!(cdr_keys(header).is_empty());

        // Chain-type marker that is not H or L.
        assert_eq!(chain_type_of("ODD_X|[1|[2]]"), b'?');
    }
}
