use dsc_spi::store::{
    AssetIndex, AssetLoader, ContractDefinitionStore, DataAddressResolver,
    FederatedCacheNodeDirectory, TransferProcessStore,
};
use dsc_spi::types::{Asset, DataAddress};
use dsc_spi::{ServiceExtension, ServiceExtensionContext};
use dsc_stores::InMemoryStoresExtension;

#[test]
fn test_loader_is_shared_between_index_and_resolver() {
    let mut context = ServiceExtensionContext::new(dsc_common::config::empty());
    InMemoryStoresExtension::new()
        .initialize(&mut context)
        .unwrap();

    let loader = context.get_service::<dyn AssetLoader>().unwrap();
    loader
        .accept(Asset::new("asset-1"), DataAddress::new("file"))
        .unwrap();

    let index = context.get_service::<dyn AssetIndex>().unwrap();
    assert!(index.find_by_id("asset-1").is_some());

    let resolver = context.get_service::<dyn DataAddressResolver>().unwrap();
    assert_eq!(
        resolver.resolve_for_asset("asset-1").unwrap().address_type(),
        "file"
    );

    assert!(context.has_service::<dyn ContractDefinitionStore>());
    assert!(context.has_service::<dyn TransferProcessStore>());
    assert!(context.has_service::<dyn FederatedCacheNodeDirectory>());
}

#[test]
fn test_node_directory_can_be_left_out() {
    let mut context = ServiceExtensionContext::new(dsc_common::config::empty());
    let mut extension = InMemoryStoresExtension::new().without_node_directory();
    assert!(!extension
        .provides()
        .contains(&dsc_spi::features::NODE_DIRECTORY));

    extension.initialize(&mut context).unwrap();
    assert!(!context.has_service::<dyn FederatedCacheNodeDirectory>());
}
