use crate::edge::Edges;

/// Edge flags after chip-select masking.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Gated {
    pub capture: bool,
    pub shift: bool,
}

/// `select_n` is active-low: edges pass only while it is held low on this tick.
pub fn gate(select_n: bool, edges: Edges) -> Gated {
    let selected = !select_n;
    Gated {
        capture: selected && edges.rose,
        shift: selected && edges.fell,
    }
}
