use crate::as_graph::{ASGraph, AS, ASN};
use crate::error::SimError;

const EXPECTED_HEADER: &[&str] = &[
    "asn",
    "peers",
    "customers",
    "providers",
    "input_clique",
    "ixp",
    "customer_cone_size",
    "propagation_rank",
    "stubs",
    "stub",
    "multihomed",
    "transit",
];

struct Row {
    asn: ASN,
    peers: Vec<ASN>,
    customers: Vec<ASN>,
    providers: Vec<ASN>,
    input_clique: bool,
    ixp: bool,
    customer_cone_size: u64,
    propagation_rank: u32,
    stub: bool,
    multihomed: bool,
    transit: bool,
}

/// Parses a tab-separated AS-relationship file into an `ASGraph`.
///
/// Two passes: the first reads every row's scalar columns (so every ASN
/// the file declares is known), the second resolves the `{a,b,c}`
/// neighbor-set columns against the now-complete ASN set. An ASN named in
/// a set but never given its own row is dropped rather than rejected.
pub fn load_as_graph(contents: &str) -> Result<ASGraph, SimError> {
    let mut lines = contents.lines();
    let header = lines.next().unwrap_or("");
    let header_cols: Vec<&str> = header.split('\t').collect();
    if header_cols != EXPECTED_HEADER {
        return Err(SimError::MalformedHeader(header.to_string()));
    }

    let mut known_asns = std::collections::HashSet::new();
    let mut raw_rows = Vec::new();

    for line in lines {
        if line.is_empty() {
            continue;
        }
        let cols: Vec<&str> = line.split('\t').collect();
        if cols.len() != EXPECTED_HEADER.len() {
            return Err(SimError::MalformedHeader(line.to_string()));
        }

        let asn = parse_u32(cols[0])?;
        let customer_cone_size = parse_u64(cols[6])?;
        let propagation_rank = parse_u32(cols[7])?;
        let input_clique = parse_bool(cols[4]);
        let ixp = parse_bool(cols[5]);
        let stub = parse_bool(cols[9]);
        let multihomed = parse_bool(cols[10]);
        let transit = parse_bool(cols[11]);

        known_asns.insert(asn);
        raw_rows.push((
            asn,
            cols[1].to_string(),
            cols[2].to_string(),
            cols[3].to_string(),
            input_clique,
            ixp,
            customer_cone_size,
            propagation_rank,
            stub,
            multihomed,
            transit,
        ));
    }

    let mut rows = Vec::with_capacity(raw_rows.len());
    for (asn, peers_raw, customers_raw, providers_raw, input_clique, ixp, customer_cone_size, propagation_rank, stub, multihomed, transit) in raw_rows {
        rows.push(Row {
            asn,
            peers: parse_asn_set(&peers_raw, &known_asns)?,
            customers: parse_asn_set(&customers_raw, &known_asns)?,
            providers: parse_asn_set(&providers_raw, &known_asns)?,
            input_clique,
            ixp,
            customer_cone_size,
            propagation_rank,
            stub,
            multihomed,
            transit,
        });
    }

    let mut graph = ASGraph::new();
    for row in rows {
        graph.insert(AS {
            asn: row.asn,
            peers: row.peers,
            providers: row.providers,
            customers: row.customers,
            input_clique: row.input_clique,
            ixp: row.ixp,
            stub: row.stub,
            multihomed: row.multihomed,
            transit: row.transit,
            customer_cone_size: row.customer_cone_size,
            propagation_rank: row.propagation_rank,
        });
    }
    graph.calculate_propagation_ranks();
    Ok(graph)
}

fn parse_u32(s: &str) -> Result<u32, SimError> {
    s.parse().map_err(|_| SimError::MalformedInteger(s.to_string()))
}

fn parse_u64(s: &str) -> Result<u64, SimError> {
    s.parse().map_err(|_| SimError::MalformedInteger(s.to_string()))
}

fn parse_bool(s: &str) -> bool {
    s == "True"
}

fn parse_asn_set(s: &str, known: &std::collections::HashSet<ASN>) -> Result<Vec<ASN>, SimError> {
    let s = s.trim();
    if !s.starts_with('{') || !s.ends_with('}') {
        return Err(SimError::MalformedAsnSet(s.to_string()));
    }
    let inner = &s[1..s.len() - 1];
    if inner.is_empty() {
        return Ok(Vec::new());
    }
    let mut out = Vec::new();
    for tok in inner.split(',') {
        let tok = tok.trim();
        let asn: ASN = tok.parse().map_err(|_| SimError::MalformedAsnSet(s.to_string()))?;
        if known.contains(&asn) {
            out.push(asn);
        } else {
            eprintln!("graph_loader: dropping unknown neighbor ASN {asn}");
        }
    }
    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> String {
        [
            "asn\tpeers\tcustomers\tproviders\tinput_clique\tixp\tcustomer_cone_size\tpropagation_rank\tstubs\tstub\tmultihomed\ttransit",
            "1\t{}\t{2,3}\t{}\tTrue\tFalse\t3\t0\tFalse\tFalse\tFalse\tTrue",
            "2\t{}\t{}\t{1}\tFalse\tFalse\t1\t1\tFalse\tTrue\tFalse\tFalse",
            "3\t{}\t{}\t{1}\tFalse\tFalse\t1\t1\tFalse\tTrue\tFalse\tFalse",
        ]
        .join("\n")
    }

    #[test]
    fn parses_a_well_formed_file() {
        let g = load_as_graph(&sample()).unwrap();
        assert_eq!(g.len(), 3);
        let as1 = g.get(1).unwrap();
        assert_eq!(as1.customers, vec![2, 3]);
        assert!(as1.input_clique);
        assert_eq!(as1.customer_cone_size, 3);
        assert_eq!(g.propagation_ranks[0], vec![1]);
        assert_eq!(g.propagation_ranks[1], vec![2, 3]);
    }

    #[test]
    fn rejects_bad_header() {
        let bad = "asn\tpeers\n1\t{}";
        assert!(matches!(load_as_graph(bad), Err(SimError::MalformedHeader(_))));
    }

    #[test]
    fn unknown_neighbor_asn_is_dropped_not_rejected() {
        let file = [
            "asn\tpeers\tcustomers\tproviders\tinput_clique\tixp\tcustomer_cone_size\tpropagation_rank\tstubs\tstub\tmultihomed\ttransit",
            "1\t{}\t{2,999}\t{}\tFalse\tFalse\t1\t0\tFalse\tFalse\tFalse\tTrue",
            "2\t{}\t{}\t{1}\tFalse\tFalse\t1\t1\tFalse\tTrue\tFalse\tFalse",
        ]
        .join("\n");
        let g = load_as_graph(&file).unwrap();
        assert_eq!(g.get(1).unwrap().customers, vec![2]);
    }

    #[test]
    fn rejects_non_brace_wrapped_set() {
        let file = [
            "asn\tpeers\tcustomers\tproviders\tinput_clique\tixp\tcustomer_cone_size\tpropagation_rank\tstubs\tstub\tmultihomed\ttransit",
            "1\t{}\t2,3\t{}\tFalse\tFalse\t1\t0\tFalse\tFalse\tFalse\tTrue",
        ]
        .join("\n");
        assert!(matches!(load_as_graph(&file), Err(SimError::MalformedAsnSet(_))));
    }
}
