use std::fs::File;
use std::path::Path;

use hal_xdata::header::{XData, XDataVersion};
use hal_xdata::stream::Endian;
use hal_yaml::error::Result;
use hal_yaml::{Node, NodeType, Yaml};
use pretty_assertions::assert_eq;
use tracing::info;
use tracing_test::traced_test;
use walkdir::WalkDir;

fn validate_yaml(path: &Path) -> Result<()> {
    info!("testing {}", path.display());

    let expected = std::fs::read(path)?;
    let yaml = Yaml::read_from(File::open(path)?)?;

    let actual = yaml.to_bytes()?;
    assert_eq!(expected.len(), actual.len());
    assert_eq!(expected, actual);

    assert_eq!(Yaml::read(&actual)?, yaml);

    Ok(())
}

#[traced_test]
#[test]
fn validate_yaml_resources() -> Result<()> {
    let to_test = WalkDir::new(format!("{}/resources/", env!("CARGO_MANIFEST_DIR")))
        .into_iter()
        .filter_map(|e| e.ok())
        .filter(|e| e.file_type().is_file())
        .map(|e| e.into_path())
        .collect::<Vec<_>>();

    assert!(!to_test.is_empty());
    for path in to_test {
        validate_yaml(&path)?;
    }

    Ok(())
}

#[test]
fn resource_contents() -> Result<()> {
    let path = format!("{}/resources/level_v5_le.bin", env!("CARGO_MANIFEST_DIR"));
    let yaml = Yaml::read_from(File::open(path)?)?;

    assert_eq!(yaml.xdata, XData::default());
    assert_eq!(yaml.version, 5);

    let root = &yaml.root;
    assert_eq!(
        root.keys().collect::<Vec<_>>(),
        vec!["Name", "Objects", "Music", "_meta", "énigme", "empty", "Kind"]
    );
    assert_eq!(root["Name"].as_str(), "Level 1-1");
    assert_eq!(root["Objects"].len(), 2);
    assert_eq!(root["Objects"][0]["Position"][1].as_float(), -3.0);
    assert_eq!(root["Objects"][1]["Health"].as_int(), 6);
    assert_eq!(
        root["Objects"][0]["Flags"].keys().collect::<Vec<_>>(),
        vec!["boss", "Hidden"]
    );
    assert!(root["Objects"][0]["Flags"]["Hidden"].as_bool());
    assert_eq!(root["Objects"][1]["Flags"].node_type(), NodeType::Hash);
    assert_eq!(root["_meta"], Node::Invalid);
    assert_eq!(root["énigme"].as_str(), "★ カービィ");
    assert!(root["empty"].is_empty());

    let other = Yaml::read(&std::fs::read(format!(
        "{}/resources/level_v4_be.bin",
        env!("CARGO_MANIFEST_DIR")
    ))?)?;
    assert_eq!(other.xdata.endian, Endian::Big);
    assert_eq!(other.root, yaml.root);

    Ok(())
}

fn sample() -> Node {
    let mut enemy = Node::hash();
    enemy.insert("Kind", "WaddleDoo").unwrap();
    enemy.insert("beam", true).unwrap();
    enemy.insert("Speed", 0.25f32).unwrap();
    enemy.insert("hp", -1).unwrap();

    Node::from_iter([
        ("zone", Node::from("Cookie Country")),
        ("Enemies", Node::from_iter([enemy.clone(), enemy, Node::array()])),
        ("Kind", Node::from("WaddleDoo")),
        ("", Node::Invalid),
        ("Nested", Node::from_iter([("inner", Node::from_iter([("Deep", Node::hash())]))])),
    ])
}

#[test]
fn round_trip_every_layout() -> Result<()> {
    for endian in [Endian::Little, Endian::Big] {
        for major in [2, 4] {
            for version in 2..=5 {
                let yaml = Yaml::builder()
                    .xdata(
                        XData::builder()
                            .endian(endian)
                            .version(XDataVersion::new(major, 0))
                            .build(),
                    )
                    .version(version)
                    .root(sample())
                    .build();

                let data = yaml.to_bytes()?;
                let decoded = Yaml::read(&data)?;

                if version >= 4 {
                    assert_eq!(decoded, yaml);
                } else {
                    // disk order is all that is left without a permutation table
                    assert_eq!(
                        decoded.root.keys().collect::<Vec<_>>(),
                        vec!["", "Enemies", "Kind", "Nested", "zone"]
                    );
                }
                assert_eq!(decoded.to_bytes()?, data);
            }
        }
    }

    Ok(())
}
