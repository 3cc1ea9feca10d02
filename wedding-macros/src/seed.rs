use darling::{FromAttributes, FromMeta};
use heck::ToSnakeCase;
use proc_macro2::TokenStream;
use quote::quote;
use syn::{Data, DeriveInput, Error, Result};

/// Keys shared by `#[seedable(meta(..))]` and `#[unseedable(meta(..))]`
#[derive(FromMeta, Clone, Debug)]
struct TableMeta {
    name: Option<String>,
    #[darling(default)]
    order: Option<syn::Path>,
    create_table: syn::Path,
    #[darling(default)]
    create_indexes: Option<syn::Path>,
}

#[derive(FromMeta, Clone, Debug)]
struct SeedableMeta {
    #[darling(flatten)]
    table: TableMeta,
    model: syn::Path,
    #[darling(default)]
    seed_data: Option<syn::Path>,
}

#[derive(FromMeta, Clone, Debug)]
struct UnseedableMeta {
    #[darling(flatten)]
    table: TableMeta,
}

#[derive(FromAttributes, Debug)]
#[darling(attributes(seedable))]
struct SeedableOpts {
    meta: SeedableMeta,
}

#[derive(FromAttributes, Debug)]
#[darling(attributes(unseedable))]
struct UnseedableOpts {
    meta: UnseedableMeta,
}

/// Resolved pieces of the generated `WedInitializer` impl.
struct Initializer {
    ident: syn::Ident,
    name: String,
    order: TokenStream,
    has_update_col: bool,
    create_table: syn::Path,
    create_indexes: TokenStream,
}

impl Initializer {
    fn parse(input: &DeriveInput, meta: &TableMeta) -> Result<Self> {
        let Data::Enum(data) = &input.data else {
            return Err(Error::new_spanned(
                input,
                "table initializers can only be derived for iden enums",
            ));
        };
        if !data.variants.iter().any(|v| v.ident == "Table") {
            return Err(Error::new_spanned(
                &input.ident,
                "iden enum needs a `Table` variant",
            ));
        }

        Ok(Self {
            ident: input.ident.clone(),
            name: meta
                .name
                .clone()
                .unwrap_or_else(|| input.ident.to_string().to_snake_case()),
            order: meta
                .order
                .as_ref()
                .map(|p| quote!(#p))
                .unwrap_or_else(|| quote!(0)),
            has_update_col: data.variants.iter().any(|v| v.ident == "UpdatedAt"),
            create_table: meta.create_table.clone(),
            create_indexes: match &meta.create_indexes {
                Some(f) => quote!(#f(backend)),
                None => quote!(None),
            },
        })
    }

    fn expand(&self, seeding: TokenStream) -> TokenStream {
        let Self {
            ident,
            name,
            order,
            has_update_col,
            create_table,
            create_indexes,
        } = self;

        quote! {
            #[async_trait::async_trait]
            impl WedInitializer for #ident {
                fn order(&self) -> i32 {
                    #order
                }

                fn name(&self) -> &str {
                    #name
                }

                fn has_update_col(&self) -> bool {
                    #has_update_col
                }

                fn to_create_table_stmt(
                    &self,
                    backend: sea_orm::DatabaseBackend,
                ) -> sea_orm::sea_query::TableCreateStatement {
                    #create_table(backend)
                }

                fn to_drop_table_stmt(
                    &self,
                    _: sea_orm::DatabaseBackend,
                ) -> sea_orm::sea_query::TableDropStatement {
                    sea_orm::sea_query::Table::drop()
                        .table(Self::Table)
                        .if_exists()
                        .to_owned()
                }

                fn to_create_indexes_stmt(
                    &self,
                    backend: sea_orm::DatabaseBackend,
                ) -> Option<Vec<sea_orm::sea_query::IndexCreateStatement>> {
                    #create_indexes
                }

                async fn seeding_data(
                    &self,
                    transaction: &sea_orm::DatabaseTransaction,
                    ctx: &mut InitContext,
                ) -> Result<(), sea_orm::DbErr> {
                    #seeding
                }
            }
        }
    }
}

pub(crate) fn expand_seedable(input: DeriveInput) -> Result<TokenStream> {
    let opts = SeedableOpts::from_attributes(&input.attrs)
        .map_err(|e| Error::new_spanned(&input, e.to_string()))?;
    let init = Initializer::parse(&input, &opts.meta.table)?;
    let model = &opts.meta.model;
    let ident = &input.ident;

    let seed_rows = match &opts.meta.seed_data {
        Some(f) => quote!(#f(ctx).await),
        None => quote!(Ok(None)),
    };
    let initializer = init.expand(quote!(self.seed_data(transaction, ctx).await));

    Ok(quote! {
        impl SeedableInitializerTrait<#model> for #ident
        where
            Self: DataSeederTrait<#model>,
            #model: Clone + SeedableTrait,
        {}

        #[async_trait::async_trait]
        impl DataSeederTrait<#model> for #ident {
            async fn get_seed_data(
                &self,
                ctx: &mut InitContext,
            ) -> Result<Option<Vec<#model>>, sea_orm::DbErr> {
                #seed_rows
            }
        }

        #initializer
    })
}

pub(crate) fn expand_unseedable(input: DeriveInput) -> Result<TokenStream> {
    let opts = UnseedableOpts::from_attributes(&input.attrs)
        .map_err(|e| Error::new_spanned(&input, e.to_string()))?;
    Ok(Initializer::parse(&input, &opts.meta.table)?.expand(quote!(Ok(()))))
}
