// Copyright (c) 2022 Fvsplit Authors. All rights reserved.

// Split an antibody PDB file into Fv units with their antigens.
//
// The pipeline: extract variable domains from each protein chain by iterative
// match-and-mask against an antibody reference library, pair VH/VL partners
// geometrically, flag protein/nucleic antigen chains and het (hapten) antigen
// groups by CDR contacts, then write one relabeled PDB file per unit.

pub mod align;
pub mod antigen;
pub mod boundaries;
pub mod defs;
pub mod extract;
pub mod pair;
pub mod pdb;
pub mod refdata;
pub mod run;
pub mod write;
