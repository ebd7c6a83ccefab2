use mockall::mock;
use variant_engine::{
    db_types::{
        NewUpdateStatus,
        NewVariantGroup,
        NewVariantGroupWithOptions,
        NewVariantOption,
        Product,
        ShopCredentials,
        SynthesizedVariant,
        UpdateStatus,
        VariantGroup,
        VariantOption,
    },
    traits::{
        CommercePlatform,
        MetafieldInput,
        PlatformError,
        PriceUpdate,
        ProductSubmission,
        RemoteProduct,
        VariantStore,
        VariantStoreError,
    },
};

mock! {
    pub Store {}
    impl VariantStore for Store {
        async fn fetch_product(&self, product_id: i64) -> Result<Option<Product>, VariantStoreError>;
        async fn fetch_product_with_variant_groups(&self, product_id: i64) -> Result<Option<Product>, VariantStoreError>;
        async fn create_product(&self, product: &Product) -> Result<Product, VariantStoreError>;
        async fn update_product(&self, product: &Product) -> Result<Product, VariantStoreError>;
        async fn create_variant_group(&self, group: NewVariantGroup) -> Result<VariantGroup, VariantStoreError>;
        async fn create_variant(&self, option: NewVariantOption) -> Result<VariantOption, VariantStoreError>;
        async fn delete_variant(&self, option_id: i64) -> Result<(), VariantStoreError>;
        async fn delete_variant_group(&self, group_id: i64) -> Result<(), VariantStoreError>;
        async fn delete_all_synthesized_variants(&self, product_id: i64) -> Result<u64, VariantStoreError>;
        async fn create_synthesized_variants(&self, variants: &[SynthesizedVariant]) -> Result<(), VariantStoreError>;
        async fn fetch_all_synthesized_variants(&self, product_id: i64) -> Result<Vec<SynthesizedVariant>, VariantStoreError>;
        async fn replace_synthesized_variants(&self, product_id: i64, variants: &[SynthesizedVariant]) -> Result<(), VariantStoreError>;
        async fn replace_variant_configuration(&self, product: &Product, groups: &[NewVariantGroupWithOptions]) -> Result<Product, VariantStoreError>;
        async fn create_status(&self, status: NewUpdateStatus) -> Result<UpdateStatus, VariantStoreError>;
        async fn update_status(&self, status: &UpdateStatus) -> Result<UpdateStatus, VariantStoreError>;
        async fn fetch_statuses(&self, limit: i64) -> Result<Vec<UpdateStatus>, VariantStoreError>;
        async fn fetch_access_credential(&self, shop: &str) -> Result<ShopCredentials, VariantStoreError>;
        async fn save_access_credential(&self, credentials: &ShopCredentials) -> Result<(), VariantStoreError>;
    }
}

mock! {
    pub Platform {}
    impl CommercePlatform for Platform {
        async fn get_root_product(&self, credentials: &ShopCredentials, product_id: i64) -> Result<RemoteProduct, PlatformError>;
        async fn create_product(&self, credentials: &ShopCredentials, product: &ProductSubmission) -> Result<RemoteProduct, PlatformError>;
        async fn update_product(&self, credentials: &ShopCredentials, product: &ProductSubmission) -> Result<RemoteProduct, PlatformError>;
        async fn update_product_variants_batch(&self, credentials: &ShopCredentials, product_id: i64, prices: &[PriceUpdate]) -> Result<(), PlatformError>;
        async fn create_metafield(&self, credentials: &ShopCredentials, product_id: i64, metafield: &MetafieldInput) -> Result<i64, PlatformError>;
        async fn update_metafield(&self, credentials: &ShopCredentials, product_id: i64, metafield_id: i64, metafield: &MetafieldInput) -> Result<(), PlatformError>;
        async fn delete_metafield(&self, credentials: &ShopCredentials, product_id: i64, metafield_id: i64) -> Result<(), PlatformError>;
        async fn delete_variant(&self, credentials: &ShopCredentials, product_id: i64, variant_id: i64) -> Result<(), PlatformError>;
    }
}
