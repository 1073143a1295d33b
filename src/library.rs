//! Library model adapter: the parts of an Eagle `.lbr` file the semantic
//! diff looks at.

use std::collections::BTreeMap;
use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};

use roxmltree::Node;

use crate::design::{child, parse_xml};
use crate::error::{DiffError, Result};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PadKind {
    /// Plated through-hole pad (`<pad>`).
    Through,
    /// Surface mount pad (`<smd>`).
    Smd,
}

/// A named connection point of a package with every attribute it carries.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Pad {
    pub name: String,
    pub kind: PadKind,
    pub attributes: BTreeMap<String, String>,
}

impl fmt::Display for Pad {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let tag = match self.kind {
            PadKind::Through => "pad",
            PadKind::Smd => "smd",
        };
        write!(f, "{tag} {}", self.name)?;
        for (key, value) in &self.attributes {
            write!(f, " {key}={value}")?;
        }
        Ok(())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Package {
    pub name: String,
    pub pads: Vec<Pad>,
}

impl Package {
    /// Every pad grouped by name, in first-seen order within each group.
    pub fn pads_by_name(&self) -> BTreeMap<&str, Vec<&Pad>> {
        let mut map: BTreeMap<&str, Vec<&Pad>> = BTreeMap::new();
        for pad in &self.pads {
            map.entry(pad.name.as_str()).or_default().push(pad);
        }
        map
    }

    /// Names used by more than one pad, with their occurrence count.
    pub fn duplicate_pad_names(&self) -> Vec<(&str, usize)> {
        self.pads_by_name()
            .into_iter()
            .filter(|(_, pads)| pads.len() > 1)
            .map(|(name, pads)| (name, pads.len()))
            .collect()
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeviceSet {
    pub name: String,
    pub prefix: Option<String>,
    pub devices: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LibraryModel {
    pub source: PathBuf,
    pub packages: BTreeMap<String, Package>,
    pub device_sets: BTreeMap<String, DeviceSet>,
}

impl LibraryModel {
    pub fn new(source: impl Into<PathBuf>) -> Self {
        LibraryModel {
            source: source.into(),
            packages: BTreeMap::new(),
            device_sets: BTreeMap::new(),
        }
    }

    pub fn with_package(mut self, package: Package) -> Self {
        self.packages.insert(package.name.clone(), package);
        self
    }

    pub fn with_device_set(mut self, device_set: DeviceSet) -> Self {
        self.device_sets.insert(device_set.name.clone(), device_set);
        self
    }
}

pub fn parse_library(path: &Path) -> Result<LibraryModel> {
    let bytes = fs::read(path)?;
    let text = String::from_utf8(bytes).map_err(|e| DiffError::parse(path, e))?;
    parse_library_str(path, &text)
}

pub fn parse_library_str(path: &Path, text: &str) -> Result<LibraryModel> {
    let doc = parse_xml(path, text)?;
    let library = doc
        .descendants()
        .find(|n| n.has_tag_name("library"))
        .ok_or_else(|| DiffError::parse(path, "no <library> element"))?;

    let mut model = LibraryModel::new(path);

    if let Some(packages) = child(library, "packages") {
        for node in packages.children().filter(|n| n.has_tag_name("package")) {
            let package = parse_package(path, node)?;
            model.packages.insert(package.name.clone(), package);
        }
    }

    if let Some(device_sets) = child(library, "devicesets") {
        for node in device_sets.children().filter(|n| n.has_tag_name("deviceset")) {
            let device_set = parse_device_set(path, node)?;
            model.device_sets.insert(device_set.name.clone(), device_set);
        }
    }

    Ok(model)
}

fn required_name(path: &Path, node: Node) -> Result<String> {
    node.attribute("name").map(str::to_string).ok_or_else(|| {
        DiffError::parse(
            path,
            format!("<{}> without a name", node.tag_name().name()),
        )
    })
}

fn parse_package(path: &Path, node: Node) -> Result<Package> {
    let name = required_name(path, node)?;
    let mut pads = Vec::new();
    for pad in node.children().filter(|n| n.is_element()) {
        let kind = match pad.tag_name().name() {
            "pad" => PadKind::Through,
            "smd" => PadKind::Smd,
            _ => continue,
        };
        let attributes = pad
            .attributes()
            .filter(|a| a.name() != "name")
            .map(|a| (a.name().to_string(), a.value().to_string()))
            .collect();
        pads.push(Pad {
            name: required_name(path, pad)?,
            kind,
            attributes,
        });
    }
    Ok(Package { name, pads })
}

fn parse_device_set(path: &Path, node: Node) -> Result<DeviceSet> {
    let devices = child(node, "devices")
        .map(|d| {
            d.children()
                .filter(|n| n.has_tag_name("device"))
                .map(|n| n.attribute("name").unwrap_or("").to_string())
                .collect()
        })
        .unwrap_or_default();
    Ok(DeviceSet {
        name: required_name(path, node)?,
        prefix: node.attribute("prefix").map(str::to_string),
        devices,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    const LIBRARY: &str = r#"<?xml version="1.0" encoding="utf-8"?>
<!DOCTYPE eagle SYSTEM "eagle.dtd">
<eagle version="7.7.0">
<drawing>
<library>
<packages>
<package name="R0805">
<description>chip resistor</description>
<smd name="1" x="-0.95" y="0" dx="1.3" dy="1.5" layer="1"/>
<smd name="2" x="0.95" y="0" dx="1.3" dy="1.5" layer="1"/>
<wire x1="0" y1="0" x2="1" y2="0" width="0.1" layer="21"/>
</package>
<package name="TO92">
<pad name="1" x="-1.27" y="0" drill="0.8" shape="octagon"/>
<pad name="1" x="1.27" y="0" drill="0.8"/>
</package>
</packages>
<devicesets>
<deviceset name="RESISTOR" prefix="R">
<devices>
<device name="0805" package="R0805"/>
<device name="" package="TO92"/>
</devices>
</deviceset>
</devicesets>
</library>
</drawing>
</eagle>"#;

    #[test]
    fn reads_packages_pads_and_device_sets() {
        let model = parse_library_str(Path::new("r.lbr"), LIBRARY).unwrap();
        assert_eq!(model.packages.len(), 2);

        let r0805 = &model.packages["R0805"];
        assert_eq!(r0805.pads.len(), 2);
        assert_eq!(r0805.pads[0].kind, PadKind::Smd);
        assert_eq!(r0805.pads[1].attributes["x"], "0.95");
        assert!(!r0805.pads[0].attributes.contains_key("name"));

        let set = &model.device_sets["RESISTOR"];
        assert_eq!(set.prefix.as_deref(), Some("R"));
        assert_eq!(set.devices, vec!["0805", ""]);
    }

    #[test]
    fn duplicate_pad_names_are_kept() {
        let model = parse_library_str(Path::new("r.lbr"), LIBRARY).unwrap();
        let to92 = &model.packages["TO92"];
        assert_eq!(to92.pads.len(), 2);
        assert_eq!(to92.duplicate_pad_names(), vec![("1", 2)]);
        assert_eq!(to92.pads_by_name()["1"].len(), 2);
        assert!(model.packages["R0805"].duplicate_pad_names().is_empty());
    }

    #[test]
    fn malformed_input_is_a_parse_error() {
        let err = parse_library_str(Path::new("r.lbr"), "<eagle><drawing>").unwrap_err();
        assert!(matches!(err, DiffError::Parse { .. }));

        let err = parse_library_str(Path::new("r.lbr"), "<eagle/>").unwrap_err();
        assert!(matches!(err, DiffError::Parse { .. }));
    }

    #[test]
    fn pad_display_lists_attributes() {
        let model = parse_library_str(Path::new("r.lbr"), LIBRARY).unwrap();
        let pad = &model.packages["TO92"].pads[1];
        assert_eq!(pad.to_string(), "pad 1 drill=0.8 x=1.27 y=0");
    }
}
