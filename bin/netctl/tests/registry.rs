
use alloy_primitives::address;
use client::SwitchError;
use config::{chains, ContractName, LookupError};
use netctl::{format_network, format_network_line, load_registry, switch_network, utf8_vars};
use setup::{write_temp_file, NETWORKS};

fn no_env() -> Vec<(String, String)> {
    Vec::new()
}

#[test]
fn test_builtin_table_is_default() {
    let registry = load_registry(None, no_env()).unwrap();

    let sepolia = registry.resolve(chains::SEPOLIA).unwrap();
    assert!(sepolia.name.contains("Sepolia"));
    assert_eq!(sepolia.native_currency.symbol, "ETH");
    assert!(registry
        .contract_address(chains::BSC_TESTNET, ContractName::FactoryAddressV4)
        .is_ok());
}

#[test]
fn test_network_file_replaces_builtin() {
    let path = write_temp_file("networks.toml", NETWORKS);
    let registry = load_registry(Some(&path), no_env()).unwrap();

    assert_eq!(registry.len(), 2);
    assert_eq!(
        registry.resolve(chains::SEPOLIA).unwrap_err(),
        LookupError::NotFound(chains::SEPOLIA)
    );
    assert_eq!(
        registry.contract_address(97, ContractName::RouterAddress),
        Err(LookupError::NotConfigured {
            chain_id: 97,
            contract: ContractName::RouterAddress,
        })
    );
}

#[test]
fn test_env_overrides_apply() {
    let path = write_temp_file("networks-env.toml", NETWORKS);
    let vars = vec![
        (
            "NETWORK_97_ROUTER_ADDRESS".to_string(),
            "0xd99d1c33f9fc3444f8101754abc46c52416550d1".to_string(),
        ),
        (
            "NETWORK_5_RPC_URL".to_string(),
            "https://goerli.example".to_string(),
        ),
    ];

    let registry = load_registry(Some(&path), vars).unwrap();
    assert_eq!(
        registry.contract_address(97, ContractName::RouterAddress),
        Ok(address!("0xD99D1c33F9fC3444f8101754aBC46c52416550D1"))
    );
    assert!(!registry.resolve(5).unwrap().is_display_only());
}

#[cfg(unix)]
#[test]
fn test_non_utf8_variables_are_skipped() {
    use std::{ffi::OsString, os::unix::ffi::OsStringExt};

    let path = write_temp_file("networks-os.toml", NETWORKS);
    let vars = vec![
        (
            OsString::from_vec(vec![0x4e, 0x45, 0x54, 0xff, 0xfe]),
            OsString::from("ignored"),
        ),
        (
            OsString::from("NETWORK_97_RPC_URL"),
            OsString::from_vec(vec![0x68, 0x74, 0x74, 0x70, 0xff]),
        ),
        (
            OsString::from("NETWORK_97_ROUTER_ADDRESS"),
            OsString::from("0xd99d1c33f9fc3444f8101754abc46c52416550d1"),
        ),
    ];

    let registry = load_registry(Some(&path), utf8_vars(vars)).unwrap();
    assert_eq!(
        registry.contract_address(97, ContractName::RouterAddress),
        Ok(address!("0xD99D1c33F9fC3444f8101754aBC46c52416550D1"))
    );
    assert!(registry
        .resolve(97)
        .unwrap()
        .rpc_urls
        .iter()
        .all(|url| url.starts_with("https://")));
}

#[test]
fn test_invalid_override_fails_loading() {
    let path = write_temp_file("networks-bad.toml", NETWORKS);
    let vars = vec![(
        "NETWORK_97_FACTORY_ADDRESS_V1".to_string(),
        "0x1234".to_string(),
    )];

    assert!(load_registry(Some(&path), vars).is_err());
}

#[test]
fn test_missing_network_file() {
    let path = std::env::temp_dir().join("netctl-tests-does-not-exist.toml");
    assert!(load_registry(Some(&path), no_env()).is_err());
}

#[test]
fn test_format_network() {
    let path = write_temp_file("networks-format.toml", NETWORKS);
    let registry = load_registry(Some(&path), no_env()).unwrap();

    let bsc = registry.resolve(97).unwrap();
    let text = format_network(&registry, bsc);
    assert!(text.starts_with("BSC Testnet (chain 97, testnet)"));
    assert!(text.contains("FACTORY_ADDRESS_V4"));
    assert!(text.contains("0xf276ecBd1bC1D3B2BFfbF1774B0daf30a66725A7"));
    assert!(!text.contains("ROUTER_ADDRESS"));

    let goerli = registry.resolve(5).unwrap();
    let text = format_network(&registry, goerli);
    assert!(text.contains("display only"));
    assert!(text.contains("contracts: -"));

    let line = format_network_line(bsc);
    assert!(line.contains("tBNB"));
    assert!(line.ends_with("factories: V4"));
}

#[tokio::test]
async fn test_switch_without_wallet() {
    let registry = load_registry(None, no_env()).unwrap();
    let result = switch_network(&registry, None, chains::POLYGON_AMOY).await;

    assert_eq!(result, Err(SwitchError::NoWallet));
}

#[tokio::test]
async fn test_switch_display_only_network() {
    let path = write_temp_file("networks-switch.toml", NETWORKS);
    let registry = load_registry(Some(&path), no_env()).unwrap();

    let result = switch_network(&registry, Some("http://127.0.0.1:1"), 5).await;
    assert_eq!(result, Err(SwitchError::DisplayOnly(5)));
}
