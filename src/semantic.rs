//! Semantic comparison of two library models.
//!
//! Known gaps: device sets are only compared by name, and when two packages
//! have the same pad count only the old side's pad names are looked up, so a
//! pad that exists only in the new revision is not reported on its own.

use std::collections::{BTreeMap, BTreeSet};
use std::fmt;

use crate::library::{LibraryModel, Package, Pad};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Side {
    Old,
    New,
}

impl fmt::Display for Side {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Side::Old => f.write_str("old"),
            Side::New => f.write_str("new"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Finding {
    PackageAdded(String),
    PackageRemoved(String),
    /// Several pads of one package share a name; only the last one is compared.
    DuplicatePadName {
        package: String,
        pad: String,
        side: Side,
        count: usize,
    },
    PadCountMismatch {
        package: String,
        old: usize,
        new: usize,
    },
    /// `new` is `None` when the pad name no longer exists in the new package.
    PadMismatch {
        package: String,
        pad: String,
        old: Pad,
        new: Option<Pad>,
    },
    DeviceSetAdded(String),
    DeviceSetRemoved(String),
}

impl fmt::Display for Finding {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Finding::PackageAdded(name) => write!(f, "Package added: {name}"),
            Finding::PackageRemoved(name) => write!(f, "Package removed: {name}"),
            Finding::DuplicatePadName {
                package,
                pad,
                side,
                count,
            } => write!(
                f,
                "Package: {package} has {count} pads named {pad} in the {side} library"
            ),
            Finding::PadCountMismatch { package, old, new } => {
                write!(f, "Different pad count for part: {package} ({old} != {new})")
            }
            Finding::PadMismatch {
                package,
                pad,
                old,
                new,
            } => match new {
                Some(new) => write!(f, "Package: {package} Pads differ: {old} != {new}"),
                None => write!(f, "Package: {package} Pad {pad} missing from new: {old}"),
            },
            Finding::DeviceSetAdded(name) => write!(f, "Device set added: {name}"),
            Finding::DeviceSetRemoved(name) => write!(f, "Device set removed: {name}"),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DiffReport {
    pub findings: Vec<Finding>,
}

impl DiffReport {
    pub fn is_empty(&self) -> bool {
        self.findings.is_empty()
    }

    pub fn len(&self) -> usize {
        self.findings.len()
    }
}

impl fmt::Display for DiffReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for finding in &self.findings {
            writeln!(f, "{finding}")?;
        }
        Ok(())
    }
}

pub fn diff_libraries(old: &LibraryModel, new: &LibraryModel) -> DiffReport {
    let mut findings = Vec::new();

    let (added, removed) = name_difference(&old.packages, &new.packages);
    findings.extend(added.into_iter().map(Finding::PackageAdded));
    findings.extend(removed.into_iter().map(Finding::PackageRemoved));

    for (name, old_package) in &old.packages {
        if let Some(new_package) = new.packages.get(name) {
            diff_package(old_package, new_package, &mut findings);
        }
    }

    let (added, removed) = name_difference(&old.device_sets, &new.device_sets);
    findings.extend(added.into_iter().map(Finding::DeviceSetAdded));
    findings.extend(removed.into_iter().map(Finding::DeviceSetRemoved));

    DiffReport { findings }
}

/// Names only in `new`, then names only in `old`, both sorted.
fn name_difference<T>(
    old: &BTreeMap<String, T>,
    new: &BTreeMap<String, T>,
) -> (Vec<String>, Vec<String>) {
    let old_names: BTreeSet<&String> = old.keys().collect();
    let new_names: BTreeSet<&String> = new.keys().collect();
    let added = new_names.difference(&old_names).map(|s| s.to_string()).collect();
    let removed = old_names.difference(&new_names).map(|s| s.to_string()).collect();
    (added, removed)
}

fn diff_package(old: &Package, new: &Package, findings: &mut Vec<Finding>) {
    for (package, side) in [(old, Side::Old), (new, Side::New)] {
        for (pad, count) in package.duplicate_pad_names() {
            findings.push(Finding::DuplicatePadName {
                package: package.name.clone(),
                pad: pad.to_string(),
                side,
                count,
            });
        }
    }

    if old.pads.len() != new.pads.len() {
        findings.push(Finding::PadCountMismatch {
            package: old.name.clone(),
            old: old.pads.len(),
            new: new.pads.len(),
        });
        return;
    }

    let old_pads = last_pad_by_name(old);
    let new_pads = last_pad_by_name(new);
    for name in pad_names_in_order(old) {
        let old_pad = old_pads[name];
        let new_pad = new_pads.get(name).copied();
        if new_pad != Some(old_pad) {
            findings.push(Finding::PadMismatch {
                package: old.name.clone(),
                pad: name.to_string(),
                old: old_pad.clone(),
                new: new_pad.cloned(),
            });
        }
    }
}

fn last_pad_by_name(package: &Package) -> BTreeMap<&str, &Pad> {
    package
        .pads
        .iter()
        .map(|pad| (pad.name.as_str(), pad))
        .collect()
}

/// Pad names in the order they first appear in the package.
fn pad_names_in_order(package: &Package) -> Vec<&str> {
    let mut seen = BTreeSet::new();
    package
        .pads
        .iter()
        .map(|pad| pad.name.as_str())
        .filter(|name| seen.insert(*name))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::library::{DeviceSet, PadKind};

    fn pad(name: &str, x: &str) -> Pad {
        Pad {
            name: name.to_string(),
            kind: PadKind::Smd,
            attributes: [("x".to_string(), x.to_string())].into_iter().collect(),
        }
    }

    fn package(name: &str, pads: Vec<Pad>) -> Package {
        Package {
            name: name.to_string(),
            pads,
        }
    }

    fn device_set(name: &str) -> DeviceSet {
        DeviceSet {
            name: name.to_string(),
            prefix: None,
            devices: Vec::new(),
        }
    }

    #[test]
    fn identical_models_have_no_findings() {
        let lib = LibraryModel::new("a.lbr")
            .with_package(package("R0805", vec![pad("1", "0"), pad("2", "1")]))
            .with_device_set(device_set("R"));
        assert!(diff_libraries(&lib, &lib.clone()).is_empty());
    }

    #[test]
    fn pad_count_mismatch_skips_pad_comparison() {
        let old = LibraryModel::new("a").with_package(package("P", vec![pad("1", "0")]));
        let new = LibraryModel::new("b")
            .with_package(package("P", vec![pad("1", "9"), pad("2", "1")]));
        let report = diff_libraries(&old, &new);
        assert_eq!(
            report.findings,
            vec![Finding::PadCountMismatch {
                package: "P".into(),
                old: 1,
                new: 2
            }]
        );
    }

    #[test]
    fn renamed_pad_is_reported_from_old_side_only() {
        let old = LibraryModel::new("a").with_package(package("P", vec![pad("1", "0")]));
        let new = LibraryModel::new("b").with_package(package("P", vec![pad("A", "0")]));
        let report = diff_libraries(&old, &new);
        assert_eq!(
            report.findings,
            vec![Finding::PadMismatch {
                package: "P".into(),
                pad: "1".into(),
                old: pad("1", "0"),
                new: None,
            }]
        );
    }

    #[test]
    fn duplicate_names_are_flagged_and_last_one_compared() {
        let old = LibraryModel::new("a")
            .with_package(package("P", vec![pad("1", "0"), pad("1", "5")]));
        let new = LibraryModel::new("b")
            .with_package(package("P", vec![pad("1", "7"), pad("1", "5")]));
        let report = diff_libraries(&old, &new);
        assert_eq!(
            report.findings,
            vec![
                Finding::DuplicatePadName {
                    package: "P".into(),
                    pad: "1".into(),
                    side: Side::Old,
                    count: 2
                },
                Finding::DuplicatePadName {
                    package: "P".into(),
                    pad: "1".into(),
                    side: Side::New,
                    count: 2
                },
            ]
        );
    }

    #[test]
    fn device_sets_compared_by_name() {
        let old = LibraryModel::new("a")
            .with_device_set(device_set("CAP"))
            .with_device_set(device_set("RES"));
        let mut changed = device_set("RES");
        changed.prefix = Some("R".into());
        let new = LibraryModel::new("b")
            .with_device_set(changed)
            .with_device_set(device_set("LED"));
        let report = diff_libraries(&old, &new);
        assert_eq!(
            report.findings,
            vec![
                Finding::DeviceSetAdded("LED".into()),
                Finding::DeviceSetRemoved("CAP".into()),
            ]
        );
    }

    #[test]
    fn report_renders_one_line_per_finding() {
        let report = DiffReport {
            findings: vec![
                Finding::PackageAdded("C".into()),
                Finding::PadCountMismatch {
                    package: "B".into(),
                    old: 2,
                    new: 3,
                },
            ],
        };
        assert_eq!(
            report.to_string(),
            "Package added: C\nDifferent pad count for part: B (2 != 3)\n"
        );
        assert_eq!(DiffReport::default().to_string(), "");
    }
}
