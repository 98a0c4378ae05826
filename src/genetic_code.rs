//! Genetic code definitions and codon translation.
//!
//! This module provides:
//! - NCBI genetic code tables (1-33)
//! - The `CodonTranslator` seam consumed by the back-translation walk
//! - IUPAC-aware translation of single codons

use thiserror::Error;

/// Errors for codons that cannot be translated at all.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum TranslationError {
    #[error("Codon must have 3 nucleotides, got {0}")]
    WrongLength(usize),

    #[error("Codon '{codon}' contains a non-nucleotide symbol")]
    InvalidSymbol { codon: String },
}

/// Translates one codon to one residue symbol.
pub trait CodonTranslator {
    fn translate(&self, codon: &[u8]) -> Result<u8, TranslationError>;
}

/// A genetic code table for translating codons to amino acids.
#[derive(Debug, Clone)]
pub struct GeneticCode {
    /// NCBI genetic code ID
    pub id: u8,
    /// Name of the genetic code
    pub name: &'static str,
    /// Residue per codon, indexed in NCBI order (TTT, TTC, TTA, TTG, TCT, ...)
    table: [u8; 64],
}

/// Bit set of the bases (as NCBI indices) an IUPAC nucleotide code stands for.
fn base_set(symbol: u8) -> Option<u8> {
    const T: u8 = 1;
    const C: u8 = 1 << 1;
    const A: u8 = 1 << 2;
    const G: u8 = 1 << 3;

    let set = match symbol.to_ascii_uppercase() {
        b'T' | b'U' => T,
        b'C' => C,
        b'A' => A,
        b'G' => G,
        b'R' => A | G,
        b'Y' => C | T,
        b'S' => C | G,
        b'W' => A | T,
        b'K' => G | T,
        b'M' => A | C,
        b'B' => C | G | T,
        b'D' => A | G | T,
        b'H' => A | C | T,
        b'V' => A | C | G,
        b'N' => A | C | G | T,
        _ => return None,
    };
    Some(set)
}

/// Indices of the bases present in a base set, in NCBI order (T, C, A, G).
fn bases_in(set: u8) -> impl Iterator<Item = usize> {
    (0..4).filter(move |i| set & (1 << i) != 0)
}

impl GeneticCode {
    /// Creates a genetic code from its NCBI `ncbieaa` string (64 residues in TCAG order).
    fn new(id: u8, name: &'static str, ncbieaa: &str) -> Self {
        let mut table = [b'X'; 64];
        for (slot, aa) in table.iter_mut().zip(ncbieaa.bytes()) {
            *slot = aa;
        }
        Self { id, name, table }
    }

    fn lookup(&self, first: usize, second: usize, third: usize) -> u8 {
        self.table[first * 16 + second * 4 + third]
    }

    /// Translates a single codon to an amino acid.
    ///
    /// # Rules:
    /// - Input is case-insensitive and `U` reads as `T`
    /// - Stop codons translate to `*`
    /// - Ambiguous codons resolve to the residue every expansion agrees on,
    ///   to `B` (D/N), `Z` (E/Q) or `J` (I/L) when they only span such a pair,
    ///   and to `X` otherwise
    /// - Anything that is not 3 IUPAC nucleotides (gaps included) is an error
    pub fn translate_codon(&self, codon: &[u8]) -> Result<u8, TranslationError> {
        if codon.len() != 3 {
            return Err(TranslationError::WrongLength(codon.len()));
        }

        let invalid = || TranslationError::InvalidSymbol {
            codon: String::from_utf8_lossy(codon).into_owned(),
        };
        let first = base_set(codon[0]).ok_or_else(invalid)?;
        let second = base_set(codon[1]).ok_or_else(invalid)?;
        let third = base_set(codon[2]).ok_or_else(invalid)?;

        let mut residues: Vec<u8> = Vec::with_capacity(4);
        for b1 in bases_in(first) {
            for b2 in bases_in(second) {
                for b3 in bases_in(third) {
                    let aa = self.lookup(b1, b2, b3);
                    if !residues.contains(&aa) {
                        residues.push(aa);
                    }
                }
            }
        }

        Ok(resolve_ambiguity(&residues))
    }
}

/// Collapses the residues an ambiguous codon may encode into one symbol.
fn resolve_ambiguity(residues: &[u8]) -> u8 {
    fn within(residues: &[u8], pair: &[u8]) -> bool {
        residues.iter().all(|aa| pair.contains(aa))
    }

    match residues {
        [single] => *single,
        _ if within(residues, b"DN") => b'B',
        _ if within(residues, b"EQ") => b'Z',
        _ if within(residues, b"IL") => b'J',
        _ => b'X',
    }
}

impl CodonTranslator for GeneticCode {
    fn translate(&self, codon: &[u8]) -> Result<u8, TranslationError> {
        self.translate_codon(codon)
    }
}

/// All available genetic codes from NCBI.
pub struct GeneticCodes {
    codes: Vec<GeneticCode>,
}

impl GeneticCodes {
    /// Creates the complete set of NCBI genetic codes.
    pub fn new() -> Self {
        let codes = vec![
            GeneticCode::new(1, "Standard",
                "FFLLSSSSYY**CC*WLLLLPPPPHHQQRRRRIIIMTTTTNNKKSSRRVVVVAAAADDEEGGGG"),
            GeneticCode::new(2, "Vertebrate Mitochondrial",
                "FFLLSSSSYY**CCWWLLLLPPPPHHQQRRRRIIMMTTTTNNKKSS**VVVVAAAADDEEGGGG"),
            GeneticCode::new(3, "Yeast Mitochondrial",
                "FFLLSSSSYY**CCWWTTTTPPPPHHQQRRRRIIMMTTTTNNKKSSRRVVVVAAAADDEEGGGG"),
            GeneticCode::new(4, "Mold/Protozoan/Coelenterate Mitochondrial",
                "FFLLSSSSYY**CCWWLLLLPPPPHHQQRRRRIIIMTTTTNNKKSSRRVVVVAAAADDEEGGGG"),
            GeneticCode::new(5, "Invertebrate Mitochondrial",
                "FFLLSSSSYY**CCWWLLLLPPPPHHQQRRRRIIMMTTTTNNKKSSSSVVVVAAAADDEEGGGG"),
            GeneticCode::new(6, "Ciliate/Dasycladacean/Hexamita Nuclear",
                "FFLLSSSSYYQQCC*WLLLLPPPPHHQQRRRRIIIMTTTTNNKKSSRRVVVVAAAADDEEGGGG"),
            GeneticCode::new(9, "Echinoderm/Flatworm Mitochondrial",
                "FFLLSSSSYY**CCWWLLLLPPPPHHQQRRRRIIIMTTTTNNNKSSSSVVVVAAAADDEEGGGG"),
            GeneticCode::new(10, "Euplotid Nuclear",
                "FFLLSSSSYY**CCCWLLLLPPPPHHQQRRRRIIIMTTTTNNKKSSRRVVVVAAAADDEEGGGG"),
            GeneticCode::new(11, "Bacterial/Archaeal/Plant Plastid",
                "FFLLSSSSYY**CC*WLLLLPPPPHHQQRRRRIIIMTTTTNNKKSSRRVVVVAAAADDEEGGGG"),
            GeneticCode::new(12, "Alternative Yeast Nuclear",
                "FFLLSSSSYY**CC*WLLLSPPPPHHQQRRRRIIIMTTTTNNKKSSRRVVVVAAAADDEEGGGG"),
            GeneticCode::new(13, "Ascidian Mitochondrial",
                "FFLLSSSSYY**CCWWLLLLPPPPHHQQRRRRIIMMTTTTNNKKSSGGVVVVAAAADDEEGGGG"),
            GeneticCode::new(14, "Alternative Flatworm Mitochondrial",
                "FFLLSSSSYYY*CCWWLLLLPPPPHHQQRRRRIIIMTTTTNNNKSSSSVVVVAAAADDEEGGGG"),
            GeneticCode::new(15, "Blepharisma Macronuclear",
                "FFLLSSSSYY*QCC*WLLLLPPPPHHQQRRRRIIIMTTTTNNKKSSRRVVVVAAAADDEEGGGG"),
            GeneticCode::new(16, "Chlorophycean Mitochondrial",
                "FFLLSSSSYY*LCC*WLLLLPPPPHHQQRRRRIIIMTTTTNNKKSSRRVVVVAAAADDEEGGGG"),
            GeneticCode::new(21, "Trematode Mitochondrial",
                "FFLLSSSSYY**CCWWLLLLPPPPHHQQRRRRIIMMTTTTNNNKSSSSVVVVAAAADDEEGGGG"),
            GeneticCode::new(22, "Scenedesmus obliquus Mitochondrial",
                "FFLLSS*SYY*LCC*WLLLLPPPPHHQQRRRRIIIMTTTTNNKKSSRRVVVVAAAADDEEGGGG"),
            GeneticCode::new(23, "Thraustochytrium Mitochondrial",
                "FF*LSSSSYY**CC*WLLLLPPPPHHQQRRRRIIIMTTTTNNKKSSRRVVVVAAAADDEEGGGG"),
            GeneticCode::new(24, "Rhabdopleuridae Mitochondrial",
                "FFLLSSSSYY**CCWWLLLLPPPPHHQQRRRRIIIMTTTTNNKKSSSKVVVVAAAADDEEGGGG"),
            GeneticCode::new(25, "Candidate Division SR1/Gracilibacteria",
                "FFLLSSSSYY**CCGWLLLLPPPPHHQQRRRRIIIMTTTTNNKKSSRRVVVVAAAADDEEGGGG"),
            GeneticCode::new(26, "Pachysolen tannophilus Nuclear",
                "FFLLSSSSYY**CC*WLLLAPPPPHHQQRRRRIIIMTTTTNNKKSSRRVVVVAAAADDEEGGGG"),
            GeneticCode::new(27, "Karyorelict Nuclear",
                "FFLLSSSSYYQQCCWWLLLLPPPPHHQQRRRRIIIMTTTTNNKKSSRRVVVVAAAADDEEGGGG"),
            GeneticCode::new(28, "Condylostoma Nuclear",
                "FFLLSSSSYYQQCCWWLLLLPPPPHHQQRRRRIIIMTTTTNNKKSSRRVVVVAAAADDEEGGGG"),
            GeneticCode::new(29, "Mesodinium Nuclear",
                "FFLLSSSSYYYYCC*WLLLLPPPPHHQQRRRRIIIMTTTTNNKKSSRRVVVVAAAADDEEGGGG"),
            GeneticCode::new(30, "Peritrich Nuclear",
                "FFLLSSSSYYEECC*WLLLLPPPPHHQQRRRRIIIMTTTTNNKKSSRRVVVVAAAADDEEGGGG"),
            GeneticCode::new(31, "Blastocrithidia Nuclear",
                "FFLLSSSSYYEECCWWLLLLPPPPHHQQRRRRIIIMTTTTNNKKSSRRVVVVAAAADDEEGGGG"),
            GeneticCode::new(32, "Balanophoraceae Plastid",
                "FFLLSSSSYY*WCC*WLLLLPPPPHHQQRRRRIIIMTTTTNNKKSSRRVVVVAAAADDEEGGGG"),
            GeneticCode::new(33, "Cephalodiscidae Mitochondrial",
                "FFLLSSSSYYY*CCWWLLLLPPPPHHQQRRRRIIIMTTTTNNKKSSSKVVVVAAAADDEEGGGG"),
        ];

        Self { codes }
    }

    /// Gets a genetic code by ID.
    pub fn get(&self, id: u8) -> Option<&GeneticCode> {
        self.codes.iter().find(|c| c.id == id)
    }

    /// Gets the default (Standard) genetic code.
    pub fn default_code(&self) -> &GeneticCode {
        // Table 1 is the first entry of the list built in `new`.
        &self.codes[0]
    }
}

impl Default for GeneticCodes {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn standard(codon: &str) -> Result<char, TranslationError> {
        let codes = GeneticCodes::new();
        codes
            .default_code()
            .translate_codon(codon.as_bytes())
            .map(char::from)
    }

    #[test]
    fn test_standard_code_translation() {
        assert_eq!(standard("ATG"), Ok('M')); // Start codon
        assert_eq!(standard("TAA"), Ok('*')); // Stop codon
        assert_eq!(standard("TAG"), Ok('*'));
        assert_eq!(standard("TGA"), Ok('*'));
        assert_eq!(standard("TTT"), Ok('F'));
        assert_eq!(standard("AAA"), Ok('K'));
        assert_eq!(standard("GGG"), Ok('G'));
    }

    #[test]
    fn test_default_code_is_standard() {
        let codes = GeneticCodes::new();
        assert_eq!(codes.default_code().id, 1);
        assert_eq!(codes.default_code().name, "Standard");
    }

    #[test]
    fn test_rna_and_case() {
        assert_eq!(standard("AUG"), Ok('M'));
        assert_eq!(standard("uuu"), Ok('F'));
        assert_eq!(standard("AtG"), Ok('M'));
    }

    #[test]
    fn test_ambiguous_nucleotides() {
        // Fourfold degenerate site
        assert_eq!(standard("GGN"), Ok('G'));
        assert_eq!(standard("CTN"), Ok('L'));
        // R = A/G at a twofold site
        assert_eq!(standard("AAR"), Ok('K'));
        assert_eq!(standard("TAR"), Ok('*'));
        // Pairs
        assert_eq!(standard("RAY"), Ok('B'));
        assert_eq!(standard("SAR"), Ok('Z'));
        assert_eq!(standard("MTT"), Ok('J'));
        // Anything broader
        assert_eq!(standard("NNN"), Ok('X'));
        assert_eq!(standard("ATN"), Ok('X'));
    }

    #[test]
    fn test_malformed_codons() {
        assert_eq!(standard("AT"), Err(TranslationError::WrongLength(2)));
        assert_eq!(standard("ATGA"), Err(TranslationError::WrongLength(4)));
        assert_eq!(
            standard("A-G"),
            Err(TranslationError::InvalidSymbol {
                codon: "A-G".to_string()
            })
        );
        assert!(standard("---").is_err());
        assert!(standard("A1G").is_err());
    }

    #[test]
    fn test_different_genetic_codes() {
        let codes = GeneticCodes::new();

        // In standard code, TGA is stop
        let standard = codes.get(1).unwrap();
        assert_eq!(standard.translate(b"TGA"), Ok(b'*'));

        // In vertebrate mitochondrial (code 2), TGA is Trp (W)
        let vert_mito = codes.get(2).unwrap();
        assert_eq!(vert_mito.translate(b"TGA"), Ok(b'W'));
        assert_eq!(vert_mito.translate(b"AGA"), Ok(b'*'));
    }

    #[test]
    fn test_unknown_code() {
        let codes = GeneticCodes::new();
        assert!(codes.get(7).is_none());
        assert!(codes.get(34).is_none());
        assert_eq!((1..=33).filter(|&id| codes.get(id).is_some()).count(), 27);
    }
}
