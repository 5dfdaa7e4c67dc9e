use std::fmt;
use std::net::{IpAddr, SocketAddr};
use std::time::Duration;

use log::{debug, trace};
use snmp2::{Oid, SyncSession, Value};

use crate::{Error, Result};

const SNMP_PORT: u16 = 161;
const MAX_REPETITIONS: u32 = 10;

/// An owned SNMP value, reduced to what the checks need.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum SnmpValue {
    Integer(i64),
    Text(String),
}

impl SnmpValue {
    /// Coerces the value into an integer. Octet strings holding a decimal number are accepted,
    /// since some agents report gauges that way.
    pub fn as_integer(&self) -> Result<i64> {
        match self {
            SnmpValue::Integer(i) => Ok(*i),
            SnmpValue::Text(s) => s
                .trim()
                .parse()
                .map_err(|_| Error::NotAnInteger(s.clone())),
        }
    }
}

impl fmt::Display for SnmpValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SnmpValue::Integer(i) => write!(f, "{i}"),
            SnmpValue::Text(s) => f.write_str(s),
        }
    }
}

impl From<i64> for SnmpValue {
    fn from(i: i64) -> Self {
        SnmpValue::Integer(i)
    }
}

impl From<&str> for SnmpValue {
    fn from(s: &str) -> Self {
        SnmpValue::Text(s.to_owned())
    }
}

/// Anything able to walk a set of table columns.
///
/// The columns are walked side by side and the values are returned row by row: first the
/// value of every column for the first row, then for the second, and so on. An empty result
/// means the agent has no such table.
pub trait Walker {
    fn walk(&mut self, columns: &[&str]) -> Result<Vec<SnmpValue>>;
}

/// An SNMP v2c session to one agent.
pub struct Session {
    session: SyncSession,
}

impl Session {
    pub fn new_v2c(host: &str, community: &str, timeout: Duration) -> Result<Self> {
        let address = agent_address(host);
        debug!("opening SNMP v2c session to {address}");

        let session =
            SyncSession::new_v2c(address.as_str(), community.as_bytes(), Some(timeout), 0)
                .map_err(|source| Error::Session {
                    host: host.to_owned(),
                    source,
                })?;

        Ok(Session { session })
    }

    /// Walks a single column with GETBULK until the agent leaves its subtree.
    fn walk_column(&mut self, column: &str) -> Result<Vec<SnmpValue>> {
        let root = parse_oid(column)?;
        let mut current = root.clone();
        let mut values = Vec::new();

        loop {
            let response = self
                .session
                .getbulk(&[&current], 0, MAX_REPETITIONS)
                .map_err(|e| Error::Request {
                    oid: column.to_owned(),
                    reason: format!("{e:?}"),
                })?;

            let page = read_page(&root, &current, response.varbinds);
            values.extend(page.values);

            match page.next {
                Some(oid) => current = oid,
                None => break,
            }
        }

        debug!("walked {column}: {} values", values.len());
        Ok(values)
    }
}

/// What one GETBULK response adds to a column walk.
#[derive(Debug, Default)]
struct Page {
    values: Vec<SnmpValue>,
    /// Where to continue, None once the walk is finished.
    next: Option<Oid<'static>>,
}

/// Collects the varbinds of one response that still belong to the column under `root`.
///
/// The walk ends at the first varbind outside the subtree, at an end-of-view marker, at an OID
/// that does not sort after its predecessor, or when the response is empty.
fn read_page<'a, I>(root: &Oid<'_>, current: &Oid<'_>, varbinds: I) -> Page
where
    I: IntoIterator<Item = (Oid<'a>, Value<'a>)>,
{
    let mut page = Page::default();
    let mut last = arcs(current);

    for (oid, value) in varbinds {
        let position = arcs(&oid);
        if !oid.starts_with(root) || is_end_of_view(&value) || position <= last {
            page.next = None;
            return page;
        }

        trace!("{oid} = {value:?}");
        page.values.push(convert(&value));
        page.next = Some(oid.to_owned());
        last = position;
    }

    page
}

/// The numeric arcs of an OID, which order OIDs the way agents walk them.
fn arcs(oid: &Oid<'_>) -> Vec<u64> {
    oid.iter().map(|sub| sub.collect()).unwrap_or_default()
}

impl Walker for Session {
    fn walk(&mut self, columns: &[&str]) -> Result<Vec<SnmpValue>> {
        let walked = columns
            .iter()
            .map(|column| self.walk_column(column))
            .collect::<Result<Vec<_>>>()?;

        interleave(columns, walked)
    }
}

/// Turns per-column values into one row-major list. All columns must have the same length,
/// otherwise the rows could not be matched up.
pub fn interleave(columns: &[&str], walked: Vec<Vec<SnmpValue>>) -> Result<Vec<SnmpValue>> {
    let rows = walked.first().map_or(0, Vec::len);

    for (column, values) in columns.iter().zip(&walked) {
        if values.len() != rows {
            return Err(Error::RaggedWalk {
                oid: column.to_string(),
                got: values.len(),
                expected: rows,
            });
        }
    }

    let mut iters: Vec<_> = walked.into_iter().map(Vec::into_iter).collect();
    let mut out = Vec::with_capacity(rows * iters.len());
    for _ in 0..rows {
        out.extend(iters.iter_mut().filter_map(Iterator::next));
    }

    Ok(out)
}

/// Parses a dotted OID, with or without the leading dot.
pub fn parse_oid(s: &str) -> Result<Oid<'static>> {
    let parts = s
        .trim()
        .split('.')
        .filter(|p| !p.is_empty())
        .map(|p| p.parse::<u64>())
        .collect::<std::result::Result<Vec<u64>, _>>()
        .map_err(|_| Error::InvalidOid(s.to_owned()))?;

    Oid::from(&parts).map_err(|_| Error::InvalidOid(s.to_owned()))
}

/// Adds the SNMP port to the host unless it carries one already.
pub fn agent_address(host: &str) -> String {
    if host.parse::<SocketAddr>().is_ok() {
        return host.to_owned();
    }

    if let Ok(ip) = host.parse::<IpAddr>() {
        return SocketAddr::new(ip, SNMP_PORT).to_string();
    }

    match host.rsplit_once(':') {
        Some((_, port)) if port.parse::<u16>().is_ok() => host.to_owned(),
        _ => format!("{host}:{SNMP_PORT}"),
    }
}

fn is_end_of_view(value: &Value<'_>) -> bool {
    matches!(
        value,
        Value::EndOfMibView | Value::NoSuchObject | Value::NoSuchInstance
    )
}

fn convert(value: &Value<'_>) -> SnmpValue {
    match value {
        Value::Integer(i) => SnmpValue::Integer(*i),
        Value::Counter32(i) | Value::Unsigned32(i) | Value::Timeticks(i) => {
            SnmpValue::Integer(i64::from(*i))
        }
        Value::Counter64(i) => match i64::try_from(*i) {
            Ok(i) => SnmpValue::Integer(i),
            Err(_) => SnmpValue::Text(i.to_string()),
        },
        Value::OctetString(bytes) => SnmpValue::Text(String::from_utf8_lossy(bytes).into_owned()),
        other => SnmpValue::Text(format!("{other:?}")),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_as_integer() {
        assert_eq!(SnmpValue::Integer(-42).as_integer().unwrap(), -42);
        assert_eq!(SnmpValue::from("180000").as_integer().unwrap(), 180000);
        assert_eq!(SnmpValue::from(" 25 ").as_integer().unwrap(), 25);

        match SnmpValue::from("PSU-1").as_integer() {
            Err(Error::NotAnInteger(s)) => assert_eq!(s, "PSU-1"),
            other => panic!("unexpected result: {other:?}"),
        }
    }

    #[test]
    fn test_parse_oid() {
        let oid = parse_oid(".1.3.6.1.4.1.2544.1.11.7.4.5.1.2.1").unwrap();
        assert_eq!(oid, parse_oid("1.3.6.1.4.1.2544.1.11.7.4.5.1.2.1").unwrap());

        assert!(parse_oid(".1.3.six").is_err());
    }

    #[test]
    fn test_agent_address() {
        assert_eq!(agent_address("10.0.0.1"), "10.0.0.1:161");
        assert_eq!(agent_address("10.0.0.1:1161"), "10.0.0.1:1161");
        assert_eq!(agent_address("fsp.example.net"), "fsp.example.net:161");
        assert_eq!(agent_address("fsp.example.net:1161"), "fsp.example.net:1161");
        assert_eq!(agent_address("::1"), "[::1]:161");
        assert_eq!(agent_address("[::1]:1161"), "[::1]:1161");
    }

    fn varbind(oid: &str, value: Value<'static>) -> (Oid<'static>, Value<'static>) {
        (parse_oid(oid).unwrap(), value)
    }

    #[test]
    fn test_read_page_continues() {
        let root = parse_oid(".1.3.6.1.4.1.2544.1.11.11.1.2.1.1.1.7.1").unwrap();
        let page = read_page(
            &root,
            &root,
            vec![
                varbind(".1.3.6.1.4.1.2544.1.11.11.1.2.1.1.1.7.1.1", Value::Integer(230000)),
                varbind(".1.3.6.1.4.1.2544.1.11.11.1.2.1.1.1.7.1.2", Value::Integer(180000)),
            ],
        );

        assert_eq!(
            page.values,
            vec![SnmpValue::Integer(230000), SnmpValue::Integer(180000)]
        );
        assert_eq!(
            page.next,
            Some(parse_oid(".1.3.6.1.4.1.2544.1.11.11.1.2.1.1.1.7.1.2").unwrap())
        );
    }

    #[test]
    fn test_read_page_leaves_subtree() {
        let root = parse_oid(".1.3.6.1.4.1.2544.1.11.11.1.2.1.1.1.7.1").unwrap();
        let page = read_page(
            &root,
            &root,
            vec![
                varbind(".1.3.6.1.4.1.2544.1.11.11.1.2.1.1.1.7.1.1", Value::Integer(230000)),
                varbind(".1.3.6.1.4.1.2544.1.11.11.1.2.1.1.1.8.1.1", Value::Integer(1)),
                varbind(".1.3.6.1.4.1.2544.1.11.11.1.2.1.1.1.8.1.2", Value::Integer(2)),
            ],
        );

        assert_eq!(page.values, vec![SnmpValue::Integer(230000)]);
        assert_eq!(page.next, None);
    }

    #[test]
    fn test_read_page_end_of_view() {
        let root = parse_oid(".1.3.6.1.4.1.2544.1.11.7.4.5.1.2.1").unwrap();

        for marker in [Value::EndOfMibView, Value::NoSuchObject, Value::NoSuchInstance] {
            let page = read_page(
                &root,
                &root,
                vec![
                    varbind(".1.3.6.1.4.1.2544.1.11.7.4.5.1.2.1.1", Value::Integer(2)),
                    varbind(".1.3.6.1.4.1.2544.1.11.7.4.5.1.2.1.2", marker),
                ],
            );

            assert_eq!(page.values, vec![SnmpValue::Integer(2)]);
            assert_eq!(page.next, None);
        }
    }

    #[test]
    fn test_read_page_empty_response() {
        let root = parse_oid(".1.3.6.1.4.1.2544.1.11.7.4.5.1.2.1").unwrap();
        let page = read_page(&root, &root, Vec::new());

        assert!(page.values.is_empty());
        assert_eq!(page.next, None);
    }

    #[test]
    fn test_read_page_stops_when_not_advancing() {
        let root = parse_oid(".1.3.6.1.4.1.2544.1.11.7.4.5.1.2.1").unwrap();
        let current = parse_oid(".1.3.6.1.4.1.2544.1.11.7.4.5.1.2.1.5").unwrap();

        // An agent answering with an earlier row would restart the walk forever.
        let page = read_page(
            &root,
            &current,
            vec![varbind(".1.3.6.1.4.1.2544.1.11.7.4.5.1.2.1.3", Value::Integer(2))],
        );
        assert!(page.values.is_empty());
        assert_eq!(page.next, None);

        let page = read_page(
            &root,
            &current,
            vec![varbind(".1.3.6.1.4.1.2544.1.11.7.4.5.1.2.1.5", Value::Integer(2))],
        );
        assert_eq!(page.next, None);

        let page = read_page(
            &root,
            &current,
            vec![
                varbind(".1.3.6.1.4.1.2544.1.11.7.4.5.1.2.1.6", Value::Integer(3)),
                varbind(".1.3.6.1.4.1.2544.1.11.7.4.5.1.2.1.6", Value::Integer(3)),
            ],
        );
        assert_eq!(page.values, vec![SnmpValue::Integer(3)]);
        assert_eq!(page.next, None);
    }

    #[test]
    fn test_interleave() {
        let columns = ["a", "b"];
        let walked = vec![
            vec![SnmpValue::from("x"), SnmpValue::from("y")],
            vec![SnmpValue::Integer(1), SnmpValue::Integer(2)],
        ];

        assert_eq!(
            interleave(&columns, walked).unwrap(),
            vec![
                SnmpValue::from("x"),
                SnmpValue::Integer(1),
                SnmpValue::from("y"),
                SnmpValue::Integer(2),
            ]
        );

        assert_eq!(interleave(&columns, vec![vec![], vec![]]).unwrap(), vec![]);
    }

    #[test]
    fn test_interleave_ragged() {
        let columns = ["a", "b"];
        let walked = vec![vec![SnmpValue::Integer(1)], vec![]];

        match interleave(&columns, walked) {
            Err(Error::RaggedWalk { oid, got, expected }) => {
                assert_eq!(oid, "b");
                assert_eq!(got, 0);
                assert_eq!(expected, 1);
            }
            other => panic!("unexpected result: {other:?}"),
        }
    }
}
