use phf::{Map, phf_map};
use std::collections::BTreeMap;
use thiserror::Error;

/// Standard atomic weights for the elements the reader accepts.
pub(crate) static ATOMIC_WEIGHTS: Map<&'static str, f64> = phf_map! {
    "H" => 1.008, "He" => 4.003, "Li" => 6.94, "Be" => 9.012, "B" => 10.81,
    "C" => 12.011, "N" => 14.007, "O" => 15.999, "F" => 18.998, "Ne" => 20.180,
    "Na" => 22.990, "Mg" => 24.305, "Al" => 26.982, "Si" => 28.085, "P" => 30.974,
    "S" => 32.065, "Cl" => 35.453, "Ar" => 39.948, "K" => 39.098, "Ca" => 40.078,
    "Mn" => 54.938, "Fe" => 55.845, "Co" => 58.933, "Ni" => 58.693, "Cu" => 63.546,
    "Zn" => 65.38, "Ga" => 69.723, "Ge" => 72.630, "As" => 74.922, "Se" => 78.971,
    "Br" => 79.904, "Kr" => 83.798, "Rb" => 85.468, "Sr" => 87.62, "Mo" => 95.95,
    "Ru" => 101.07, "Rh" => 102.906, "Pd" => 106.42, "Ag" => 107.868, "Cd" => 112.414,
    "Sn" => 118.710, "Sb" => 121.760, "Te" => 127.60, "I" => 126.904, "Xe" => 131.293,
    "Cs" => 132.905, "Ba" => 137.327, "Gd" => 157.25, "W" => 183.84, "Re" => 186.207,
    "Os" => 190.23, "Ir" => 192.217, "Pt" => 195.084, "Au" => 196.967, "Hg" => 200.592,
    "Tl" => 204.38, "Pb" => 207.2, "Bi" => 208.980, "U" => 238.029, "V" => 50.942,
    "Cr" => 51.996, "Ti" => 47.867, "Y" => 88.906, "Zr" => 91.224, "La" => 138.905,
};

static DEFAULT_VALENCES: Map<&'static str, &'static [u8]> = phf_map! {
    "B" => &[3],
    "C" => &[4],
    "N" => &[3, 5],
    "O" => &[2],
    "P" => &[3, 5],
    "S" => &[2, 4, 6],
    "F" => &[1],
    "Cl" => &[1],
    "Br" => &[1],
    "I" => &[1],
};

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SmilesError {
    #[error("Empty input")]
    Empty,
    #[error("Unexpected character '{ch}' at position {pos}")]
    UnexpectedChar { ch: char, pos: usize },
    #[error("Unknown element '{0}'")]
    UnknownElement(String),
    #[error("Unclosed bracket atom starting at position {0}")]
    UnclosedBracket(usize),
    #[error("Unmatched ')' at position {0}")]
    UnmatchedParenthesis(usize),
    #[error("Unclosed branch")]
    UnclosedBranch,
    #[error("Unclosed ring bond {0}")]
    UnclosedRing(u16),
    #[error("Ring bond {0} duplicates an existing bond")]
    InvalidRingClosure(u16),
    #[error("Conflicting bond orders for ring bond {0}")]
    ConflictingRingBond(u16),
    #[error("Bond symbol without an atom on both sides")]
    DanglingBond,
    #[error("Atom {index} ({symbol}) exceeds its allowed valence")]
    InvalidValence { index: usize, symbol: String },
    #[error("Aromatic atom {0} is not part of a ring")]
    NonRingAromatic(usize),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BondOrder {
    Single,
    Double,
    Triple,
    Quadruple,
    Aromatic,
}

impl BondOrder {
    fn from_symbol(c: char) -> Option<Self> {
        match c {
            '-' | '/' | '\\' => Some(BondOrder::Single),
            '=' => Some(BondOrder::Double),
            '#' => Some(BondOrder::Triple),
            '$' => Some(BondOrder::Quadruple),
            ':' => Some(BondOrder::Aromatic),
            _ => None,
        }
    }

    /// Valence units consumed by the bond; aromatic bonds count as one, the
    /// shared pi electron is accounted for on the atom.
    pub fn valence_units(self) -> u8 {
        match self {
            BondOrder::Single | BondOrder::Aromatic => 1,
            BondOrder::Double => 2,
            BondOrder::Triple => 3,
            BondOrder::Quadruple => 4,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct MolAtom {
    /// Element symbol in canonical capitalization (`C`, `Cl`), `*` for wildcards.
    pub symbol: String,
    pub aromatic: bool,
    pub charge: i8,
    pub isotope: Option<u16>,
    /// Whether the atom was written in brackets (explicit hydrogen count).
    pub bracket: bool,
    /// Hydrogens carried by the atom itself, implicit or from a bracket count.
    pub hydrogens: u8,
}

#[derive(Debug, Clone, PartialEq)]
pub struct MolBond {
    pub begin: usize,
    pub end: usize,
    pub order: BondOrder,
    pub in_ring: bool,
}

impl MolBond {
    pub fn other(&self, atom: usize) -> usize {
        if self.begin == atom { self.end } else { self.begin }
    }
}

/// A molecular graph read from a SMILES string.
///
/// Bonds between aromatic atoms that do not lie in a ring are demoted to
/// single bonds, and implicit hydrogens are assigned from the default
/// valences of the organic subset.
#[derive(Debug, Clone, PartialEq)]
pub struct Molecule {
    atoms: Vec<MolAtom>,
    bonds: Vec<MolBond>,
    adjacency: Vec<Vec<usize>>,
}

impl Molecule {
    pub fn parse(smiles: &str) -> Result<Self, SmilesError> {
        let mut molecule = Parser::new(smiles).run()?;
        molecule.mark_ring_bonds();
        molecule.settle_aromaticity()?;
        molecule.assign_implicit_hydrogens()?;
        Ok(molecule)
    }

    pub fn atoms(&self) -> &[MolAtom] {
        &self.atoms
    }

    pub fn bonds(&self) -> &[MolBond] {
        &self.bonds
    }

    /// Bonds incident to `atom`.
    pub fn bonds_of(&self, atom: usize) -> impl Iterator<Item = &MolBond> {
        self.adjacency
            .get(atom)
            .map(Vec::as_slice)
            .unwrap_or(&[])
            .iter()
            .map(|&b| &self.bonds[b])
    }

    /// `(neighbor index, bond)` pairs around `atom`.
    pub fn neighbors(&self, atom: usize) -> impl Iterator<Item = (usize, &MolBond)> {
        self.bonds_of(atom).map(move |b| (b.other(atom), b))
    }

    /// Number of directly bonded non-hydrogen atoms.
    pub fn heavy_degree(&self, atom: usize) -> usize {
        self.neighbors(atom)
            .filter(|(n, _)| self.atoms[*n].symbol != "H")
            .count()
    }

    /// Hydrogens on `atom`, counting both implicit ones and explicit `[H]` neighbors.
    pub fn total_hydrogens(&self, atom: usize) -> u8 {
        let explicit = self
            .neighbors(atom)
            .filter(|(n, _)| self.atoms[*n].symbol == "H")
            .count() as u8;
        self.atoms[atom].hydrogens + explicit
    }

    /// Bond valence units plus hydrogens, with the pi bond of aromatic
    /// carbon-like atoms counted once.
    pub fn total_valence(&self, atom: usize) -> u8 {
        let a = &self.atoms[atom];
        let bonds: u8 = self.bonds_of(atom).map(|b| b.order.valence_units()).sum();
        let pi = match a.symbol.as_str() {
            "B" | "C" => a.aromatic,
            "N" | "P" => a.aromatic && a.hydrogens == 0 && self.heavy_degree(atom) == 2,
            _ => false,
        };
        bonds + u8::from(pi) + a.hydrogens
    }

    /// Number of disconnected fragments.
    pub fn component_count(&self) -> usize {
        let mut seen = vec![false; self.atoms.len()];
        let mut components = 0;
        for start in 0..self.atoms.len() {
            if seen[start] {
                continue;
            }
            components += 1;
            let mut stack = vec![start];
            seen[start] = true;
            while let Some(v) = stack.pop() {
                for (w, _) in self.neighbors(v) {
                    if !seen[w] {
                        seen[w] = true;
                        stack.push(w);
                    }
                }
            }
        }
        components
    }

    /// Flags every bond that is not a bridge of the graph as a ring bond.
    fn mark_ring_bonds(&mut self) {
        let n = self.atoms.len();
        let mut disc = vec![usize::MAX; n];
        let mut low = vec![0usize; n];
        let mut timer = 0usize;
        let mut bridges = vec![false; self.bonds.len()];

        for root in 0..n {
            if disc[root] != usize::MAX {
                continue;
            }
            disc[root] = timer;
            low[root] = timer;
            timer += 1;
            let mut stack: Vec<(usize, Option<usize>, usize)> = vec![(root, None, 0)];

            while let Some(top) = stack.last_mut() {
                let (v, parent_bond) = (top.0, top.1);
                if top.2 < self.adjacency[v].len() {
                    let bond_idx = self.adjacency[v][top.2];
                    top.2 += 1;
                    if Some(bond_idx) == parent_bond {
                        continue;
                    }
                    let w = self.bonds[bond_idx].other(v);
                    if disc[w] == usize::MAX {
                        disc[w] = timer;
                        low[w] = timer;
                        timer += 1;
                        stack.push((w, Some(bond_idx), 0));
                    } else {
                        low[v] = low[v].min(disc[w]);
                    }
                } else {
                    stack.pop();
                    if let (Some(&(u, _, _)), Some(bond_idx)) = (stack.last(), parent_bond) {
                        low[u] = low[u].min(low[v]);
                        if low[v] > disc[u] {
                            bridges[bond_idx] = true;
                        }
                    }
                }
            }
        }

        for (bond, is_bridge) in self.bonds.iter_mut().zip(bridges) {
            bond.in_ring = !is_bridge;
        }
    }

    fn settle_aromaticity(&mut self) -> Result<(), SmilesError> {
        for bond in self.bonds.iter_mut() {
            if bond.order == BondOrder::Aromatic && !bond.in_ring {
                bond.order = BondOrder::Single;
            }
        }
        for (idx, atom) in self.atoms.iter().enumerate() {
            if atom.aromatic && !self.bonds_of(idx).any(|b| b.in_ring) {
                return Err(SmilesError::NonRingAromatic(idx));
            }
        }
        Ok(())
    }

    fn assign_implicit_hydrogens(&mut self) -> Result<(), SmilesError> {
        for idx in 0..self.atoms.len() {
            let atom = &self.atoms[idx];
            if atom.bracket {
                continue;
            }
            let Some(allowed) = DEFAULT_VALENCES.get(atom.symbol.as_str()) else {
                continue;
            };

            let bond_units: u8 = self.bonds_of(idx).map(|b| b.order.valence_units()).sum();
            let hydrogens = if atom.aromatic {
                let donates_pi = matches!(atom.symbol.as_str(), "B" | "C" | "N" | "P");
                let saturated_n =
                    matches!(atom.symbol.as_str(), "N" | "P") && self.heavy_degree(idx) >= 3;
                if saturated_n {
                    0
                } else {
                    let used = bond_units + u8::from(donates_pi);
                    allowed.iter().find(|&&v| v >= used).map_or(0, |v| v - used)
                }
            } else {
                match allowed.iter().find(|&&v| v >= bond_units) {
                    Some(v) => v - bond_units,
                    None => {
                        return Err(SmilesError::InvalidValence {
                            index: idx,
                            symbol: atom.symbol.clone(),
                        });
                    }
                }
            };
            self.atoms[idx].hydrogens = hydrogens;
        }
        Ok(())
    }
}

struct OpenRing {
    atom: usize,
    order: Option<BondOrder>,
}

struct Parser {
    chars: Vec<char>,
    pos: usize,
    atoms: Vec<MolAtom>,
    bonds: Vec<MolBond>,
    adjacency: Vec<Vec<usize>>,
    branches: Vec<usize>,
    previous: Option<usize>,
    pending_bond: Option<BondOrder>,
    open_rings: BTreeMap<u16, OpenRing>,
}

impl Parser {
    fn new(input: &str) -> Self {
        Self {
            chars: input.trim().chars().collect(),
            pos: 0,
            atoms: Vec::new(),
            bonds: Vec::new(),
            adjacency: Vec::new(),
            branches: Vec::new(),
            previous: None,
            pending_bond: None,
            open_rings: BTreeMap::new(),
        }
    }

    fn peek(&self) -> Option<char> {
        self.chars.get(self.pos).copied()
    }

    fn unexpected(&self) -> SmilesError {
        match self.peek() {
            Some(ch) => SmilesError::UnexpectedChar { ch, pos: self.pos },
            None => SmilesError::DanglingBond,
        }
    }

    fn run(mut self) -> Result<Molecule, SmilesError> {
        if self.chars.is_empty() {
            return Err(SmilesError::Empty);
        }

        while let Some(c) = self.peek() {
            match c {
                '(' => {
                    let Some(prev) = self.previous else {
                        return Err(self.unexpected());
                    };
                    if self.pending_bond.is_some() {
                        return Err(self.unexpected());
                    }
                    self.branches.push(prev);
                    self.pos += 1;
                }
                ')' => {
                    if self.pending_bond.is_some() {
                        return Err(SmilesError::DanglingBond);
                    }
                    let Some(prev) = self.branches.pop() else {
                        return Err(SmilesError::UnmatchedParenthesis(self.pos));
                    };
                    self.previous = Some(prev);
                    self.pos += 1;
                }
                '.' => {
                    if self.pending_bond.is_some() || self.previous.is_none() {
                        return Err(self.unexpected());
                    }
                    self.previous = None;
                    self.pos += 1;
                }
                '0'..='9' | '%' => self.ring_bond()?,
                '[' => {
                    let atom = self.bracket_atom()?;
                    self.push_atom(atom);
                }
                _ => {
                    if let Some(order) = BondOrder::from_symbol(c) {
                        if self.pending_bond.is_some() || self.previous.is_none() {
                            return Err(self.unexpected());
                        }
                        self.pending_bond = Some(order);
                        self.pos += 1;
                    } else {
                        let atom = self.organic_atom()?;
                        self.push_atom(atom);
                    }
                }
            }
        }

        if self.pending_bond.is_some() {
            return Err(SmilesError::DanglingBond);
        }
        if !self.branches.is_empty() {
            return Err(SmilesError::UnclosedBranch);
        }
        if let Some((&label, _)) = self.open_rings.iter().next() {
            return Err(SmilesError::UnclosedRing(label));
        }

        Ok(Molecule {
            atoms: self.atoms,
            bonds: self.bonds,
            adjacency: self.adjacency,
        })
    }

    fn implicit_order(&self, a: usize, b: usize) -> BondOrder {
        if self.atoms[a].aromatic && self.atoms[b].aromatic {
            BondOrder::Aromatic
        } else {
            BondOrder::Single
        }
    }

    fn add_bond(&mut self, begin: usize, end: usize, order: BondOrder) {
        let idx = self.bonds.len();
        self.bonds.push(MolBond {
            begin,
            end,
            order,
            in_ring: false,
        });
        self.adjacency[begin].push(idx);
        self.adjacency[end].push(idx);
    }

    fn push_atom(&mut self, atom: MolAtom) {
        let idx = self.atoms.len();
        self.atoms.push(atom);
        self.adjacency.push(Vec::new());
        if let Some(prev) = self.previous {
            let order = self
                .pending_bond
                .take()
                .unwrap_or_else(|| self.implicit_order(prev, idx));
            self.add_bond(prev, idx, order);
        }
        self.previous = Some(idx);
    }

    fn ring_bond(&mut self) -> Result<(), SmilesError> {
        let Some(atom) = self.previous else {
            return Err(self.unexpected());
        };

        let label = if self.peek() == Some('%') {
            let digits: String = self.chars.iter().skip(self.pos + 1).take(2).collect();
            if digits.len() != 2 || !digits.chars().all(|c| c.is_ascii_digit()) {
                return Err(self.unexpected());
            }
            self.pos += 3;
            digits
                .chars()
                .filter_map(|c| c.to_digit(10))
                .fold(0u16, |acc, d| acc * 10 + d as u16)
        } else {
            let digit = self.peek().and_then(|c| c.to_digit(10)).unwrap_or(0) as u16;
            self.pos += 1;
            digit
        };

        let order = self.pending_bond.take();
        match self.open_rings.remove(&label) {
            Some(open) => {
                let duplicate = self.adjacency[atom]
                    .iter()
                    .any(|&b| self.bonds[b].other(atom) == open.atom);
                if open.atom == atom || duplicate
                {
                    return Err(SmilesError::InvalidRingClosure(label));
                }
                let order = match (open.order, order) {
                    (Some(a), Some(b)) if a != b => {
                        return Err(SmilesError::ConflictingRingBond(label));
                    }
                    (Some(a), _) | (None, Some(a)) => a,
                    (None, None) => self.implicit_order(open.atom, atom),
                };
                self.add_bond(open.atom, atom, order);
            }
            None => {
                self.open_rings.insert(label, OpenRing { atom, order });
            }
        }
        Ok(())
    }

    fn organic_atom(&mut self) -> Result<MolAtom, SmilesError> {
        let c = self.peek().ok_or(SmilesError::DanglingBond)?;
        let next = self.chars.get(self.pos + 1).copied();

        let (symbol, aromatic, width): (String, bool, usize) = match (c, next) {
            ('C', Some('l')) => ("Cl".into(), false, 2),
            ('B', Some('r')) => ("Br".into(), false, 2),
            ('B' | 'C' | 'N' | 'O' | 'P' | 'S' | 'F' | 'I', _) => (c.to_string(), false, 1),
            ('b' | 'c' | 'n' | 'o' | 'p' | 's', _) => (c.to_ascii_uppercase().to_string(), true, 1),
            ('*', _) => ("*".into(), false, 1),
            _ => return Err(self.unexpected()),
        };
        self.pos += width;

        Ok(MolAtom {
            symbol,
            aromatic,
            charge: 0,
            isotope: None,
            bracket: false,
            hydrogens: 0,
        })
    }

    fn read_number(&mut self) -> Option<u32> {
        let start = self.pos;
        while self.peek().is_some_and(|c| c.is_ascii_digit()) {
            self.pos += 1;
        }
        if start == self.pos {
            return None;
        }
        self.chars[start..self.pos]
            .iter()
            .collect::<String>()
            .parse()
            .ok()
    }

    fn bracket_atom(&mut self) -> Result<MolAtom, SmilesError> {
        let open_pos = self.pos;
        self.pos += 1;

        let isotope = self.read_number().map(|n| n as u16);

        let c = self.peek().ok_or(SmilesError::UnclosedBracket(open_pos))?;
        let next = self.chars.get(self.pos + 1).copied();
        let (symbol, aromatic) = if c == '*' {
            self.pos += 1;
            ("*".to_string(), false)
        } else if c.is_ascii_uppercase() {
            let two: String = next
                .filter(|n| n.is_ascii_lowercase())
                .map(|n| format!("{c}{n}"))
                .unwrap_or_default();
            if !two.is_empty() && ATOMIC_WEIGHTS.contains_key(two.as_str()) {
                self.pos += 2;
                (two, false)
            } else if ATOMIC_WEIGHTS.contains_key(c.to_string().as_str()) {
                self.pos += 1;
                (c.to_string(), false)
            } else {
                return Err(SmilesError::UnknownElement(c.to_string()));
            }
        } else if c.is_ascii_lowercase() {
            match (c, next) {
                ('s', Some('e')) => {
                    self.pos += 2;
                    ("Se".to_string(), true)
                }
                ('a', Some('s')) => {
                    self.pos += 2;
                    ("As".to_string(), true)
                }
                ('b' | 'c' | 'n' | 'o' | 'p' | 's', _) => {
                    self.pos += 1;
                    (c.to_ascii_uppercase().to_string(), true)
                }
                _ => return Err(SmilesError::UnknownElement(c.to_string())),
            }
        } else {
            return Err(self.unexpected());
        };

        // Chirality is accepted and discarded.
        while self.peek() == Some('@') {
            self.pos += 1;
        }
        let class: String = self.chars.iter().skip(self.pos).take(2).collect();
        if matches!(class.as_str(), "TH" | "AL" | "SP" | "TB" | "OH") {
            self.pos += 2;
            self.read_number();
        }

        let mut hydrogens = 0u8;
        if self.peek() == Some('H') {
            self.pos += 1;
            hydrogens = self.read_number().map_or(1, |n| n as u8);
        }

        let mut charge: i8 = 0;
        if let Some(sign @ ('+' | '-')) = self.peek() {
            let unit: i8 = if sign == '+' { 1 } else { -1 };
            self.pos += 1;
            if let Some(n) = self.read_number() {
                charge = unit * n as i8;
            } else {
                charge = unit;
                while self.peek() == Some(sign) {
                    self.pos += 1;
                    charge += unit;
                }
            }
        }

        if self.peek() == Some(':') {
            self.pos += 1;
            self.read_number();
        }

        if self.peek() != Some(']') {
            return Err(match self.peek() {
                Some(_) => self.unexpected(),
                None => SmilesError::UnclosedBracket(open_pos),
            });
        }
        self.pos += 1;

        Ok(MolAtom {
            symbol,
            aromatic,
            charge,
            isotope,
            bracket: true,
            hydrogens,
        })
    }
}
