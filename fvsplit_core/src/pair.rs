// Copyright (c) 2022 Fvsplit Authors. All rights reserved.

// Geometric pairing of detected domains into VH/VL units.
//
// Every ordered pair is examined: candidates need center-of-mass distance
// inside (1, 35) Angstroms, interface-center distance under 20 Angstroms and
// smaller than the bulk distance (the putative interface must actually sit
// between the two domains).  A candidate replaces existing pairings only if
// it improves at least one recorded distance for both partners; a displaced
// partner is unpaired again.  This is a greedy, order-dependent heuristic.

use crate::defs::*;

pub fn pair_domains(domains: &mut Vec<Domain>) {
    for i1 in 0..domains.len() {
        for i2 in 0..domains.len() {
            if i1 == i2 {
                continue;
            }
            let (c1, c2) = match (domains[i1].cofg, domains[i2].cofg) {
                (Some(a), Some(b)) => (a, b),
                _ => continue,
            };
            let dist_cofg_sq = dist_sq(&c1, &c2);
            if dist_cofg_sq <= 1.0 || dist_cofg_sq >= COFG_DIST_CUT_SQ {
                continue;
            }
            let (m1, m2) = match (domains[i1].int_cofg, domains[i2].int_cofg) {
                (Some(a), Some(b)) => (a, b),
                _ => continue,
            };
            let dist_int_sq = dist_sq(&m1, &m2);
            if dist_int_sq >= INT_DIST_CUT_SQ || dist_int_sq >= dist_cofg_sq {
                continue;
            }
            let improves1 = dist_cofg_sq < domains[i1].pair_cofg_dist_sq
                || dist_int_sq < domains[i1].pair_int_dist_sq;
            let improves2 = dist_cofg_sq < domains[i2].pair_cofg_dist_sq
                || dist_int_sq < domains[i2].pair_int_dist_sq;
            if !improves1 || !improves2 {
                continue;
            }

            // Unpair any displaced partners so symmetry holds.

            if let Some(old) = domains[i1].paired {
                if old != i2 {
                    domains[old].paired = None;
                }
            }
            if let Some(old) = domains[i2].paired {
                if old != i1 {
                    domains[old].paired = None;
                }
            }
            domains[i1].pair_cofg_dist_sq = dist_cofg_sq;
            domains[i1].pair_int_dist_sq = dist_int_sq;
            domains[i2].pair_cofg_dist_sq = dist_cofg_sq;
            domains[i2].pair_int_dist_sq = dist_int_sq;
            domains[i1].paired = Some(i2);
            domains[i2].paired = Some(i1);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_trace::*;

    fn domain_at(n: usize, cofg: [f64; 3], int_cofg: [f64; 3]) -> Domain {
        let mut d = Domain::new(n, n - 1);
        d.cofg = Some(cofg);
        d.int_cofg = Some(int_cofg);
        d
    }

    #[test]
    fn test_pairing_and_symmetry() {
        PrettyTrace::new().on();
        // Two domains 10 apart with interface centers 5 apart pair up; a
        // third domain 100 away stays unpaired.
        let mut domains = vec![
            domain_at(1, [0.0, 0.0, 0.0], [2.5, 0.0, 0.0]),
            domain_at(2, [10.0, 0.0, 0.0], [7.5, 0.0, 0.0]),
            domain_at(3, [100.0, 0.0, 0.0], [100.0, 0.0, 0.0]),
        ];
        pair_domains(&mut domains);
        assert_eq!(domains[0].paired, Some(1));
        assert_eq!(domains[1].paired, Some(0));
        assert_eq!(domains[2].paired, None);
        for i in 0..domains.len() {
            if let Some(j) = domains[i].paired {
                assert_eq!(domains[j].paired, Some(i));
            }
        }
    }

    #[test]
    fn test_interface_must_be_between_domains() {
        PrettyTrace::new().on();
        // Interface centers further apart than the bulk centers: rejected.
        let mut domains = vec![
            domain_at(1, [0.0, 0.0, 0.0], [0.0, 15.0, 0.0]),
            domain_at(2, [10.0, 0.0, 0.0], [10.0, -3.0, 0.0]),
        ];
        pair_domains(&mut domains);
        assert_eq!(domains[0].paired, None);
        assert_eq!(domains[1].paired, None);
    }

    #[test]
    fn test_degenerate_centers_excluded() {
        PrettyTrace::new().on();
        let mut domains = vec![
            domain_at(1, [0.0, 0.0, 0.0], [2.5, 0.0, 0.0]),
            domain_at(2, [10.0, 0.0, 0.0], [7.5, 0.0, 0.0]),
        ];
        domains[1].cofg = None;
        pair_domains(&mut domains);
        assert_eq!(domains[0].paired, None);

        // Coincident centers (distance <= 1) are also excluded.
        let mut domains = vec![
            domain_at(1, [0.0, 0.0, 0.0], [0.0, 0.0, 0.0]),
            domain_at(2, [0.5, 0.0, 0.0], [0.2, 0.0, 0.0]),
        ];
        pair_domains(&mut domains);
        assert_eq!(domains[0].paired, None);
    }
}
