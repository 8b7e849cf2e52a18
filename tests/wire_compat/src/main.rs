fn main() {
    println!("Run `cargo test -p wire-compat` to execute wire compatibility tests.");
}

#[cfg(test)]
mod tests {
    use std::fs;
    use std::path::PathBuf;

    use traybell_protocol::decode_notice;

    /// Returns the path to the fixtures directory.
    fn fixtures_dir() -> PathBuf {
        PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("fixtures")
    }

    /// Loads a fixture file as raw text, exactly as it arrives on the wire.
    fn load_fixture(name: &str) -> String {
        let path = fixtures_dir().join(name);
        fs::read_to_string(&path)
            .unwrap_or_else(|e| panic!("failed to read fixture {}: {e}", path.display()))
    }

    #[test]
    fn fixtures_are_valid_json() {
        for name in [
            "notice.json",
            "notice_minimal.json",
            "status_update.json",
            "keepalive.json",
        ] {
            let raw = load_fixture(name);
            serde_json::from_str::<serde_json::Value>(&raw)
                .unwrap_or_else(|e| panic!("fixture {name} is not valid JSON: {e}"));
        }
    }

    #[test]
    fn notice_fixture_decodes() {
        let raw = load_fixture("notice.json");
        let notice = decode_notice(&raw).expect("notice fixture must decode");
        assert_eq!(notice.message, "server update");
    }

    #[test]
    fn minimal_notice_decodes_empty_message() {
        let raw = load_fixture("notice_minimal.json");
        let notice = decode_notice(&raw).expect("minimal notice must decode");
        assert_eq!(notice.message, "");
    }

    #[test]
    fn non_notice_traffic_is_ignored() {
        for name in ["status_update.json", "keepalive.json"] {
            let raw = load_fixture(name);
            assert!(
                decode_notice(&raw).is_none(),
                "fixture {name} must not decode to a notice"
            );
        }
    }
}
