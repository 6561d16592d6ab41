use crate::{
    prelude::*,
    utils::{build_fields_enum, document_key, extract_named_fields, krate, rename_rule},
};

#[derive(FromAttributes)]
#[darling(attributes(model))]
struct Attributes {
    #[darling(default)]
    collection: Option<String>,
    #[darling(multiple, rename = "index")]
    indexes: Vec<IndexAttribute>,
}

#[derive(FromMeta)]
struct IndexAttribute {
    keys: LitStr,
    #[darling(default)]
    unique: bool,
    #[darling(default)]
    name: Option<String>,
}

struct IndexConfig {
    keys: Vec<String>,
    unique: bool,
    name: Option<String>,
}

pub fn derive_model(item: TokenStream) -> Result<TokenStream> {
    let input = parse2::<DeriveInput>(item)?;

    let attributes = Attributes::from_attributes(&input.attrs)?;

    let rule = rename_rule(&input.attrs).map_err(|err| err.with_span(&input.ident))?;

    let mut fields = Vec::new();
    for field in extract_named_fields(input.span(), input.data)?.named {
        let Some(key) = document_key(&field, rule)? else {
            continue;
        };
        if let Some(ident) = field.ident {
            fields.push((ident, LitStr::new(&key, Span::call_site())));
        }
    }

    let indexes = attributes
        .indexes
        .iter()
        .map(|index| {
            let keys = index
                .keys
                .value()
                .split(',')
                .map(|spec| spec.trim().to_owned())
                .collect_vec();

            if let Some(spec) = keys.iter().find(|spec| spec.split(':').count() != 2) {
                return Err(Error::new_spanned(
                    &index.keys,
                    format!("index key `{spec}` must be in the format of field:value"),
                ));
            }

            Ok(IndexConfig {
                keys,
                unique: index.unique,
                name: index.name.clone(),
            })
        })
        .try_collect::<_, Vec<_>, _>()?;

    build(
        &input.vis,
        &input.ident,
        attributes.collection.as_deref(),
        &fields,
        &indexes,
    )
}

fn build(
    vis: &Visibility,
    ident: &Ident,
    collection: Option<&str>,
    fields: &[(Ident, LitStr)],
    indexes: &[IndexConfig],
) -> Result<TokenStream> {
    let krate = krate();

    let lowercase_model = ident.to_string().to_snake_case();

    let mod_ident = module_ident(&lowercase_model, ident)?;

    let collection_name = LitStr::new(
        collection.unwrap_or_else(|| {
            lowercase_model
                .strip_suffix("_model")
                .unwrap_or(&lowercase_model)
        }),
        Span::call_site(),
    );

    let index_definitions = indexes.iter().map(|index| {
        let keys = &index.keys;
        let unique = index.unique;
        let name = match &index.name {
            Some(name) => quote! { ::std::option::Option::Some(#name) },
            None => quote! { ::std::option::Option::None },
        };

        quote! {
            #krate::IndexDefinition {
                keys: &[ #( #keys ),* ],
                unique: #unique,
                name: #name,
            }
        }
    });

    let fields_enum = build_fields_enum(
        fields.iter().map(|(ident, _)| ident),
        fields.iter().map(|(_, lit)| lit),
    );

    Ok(quote! {
        #vis mod #mod_ident {
            use super::*;

            impl #krate::Model for #ident {
                type Fields = Fields;

                const COLLECTION_NAME: &'static str = #collection_name;

                const INDEXES: &'static [#krate::IndexDefinition] = &[ #( #index_definitions ),* ];
            }

            #fields_enum

            #krate::__register_model!(#ident);
        }
    })
}

/// The helper module's name; keywords such as `match` become raw identifiers.
fn module_ident(name: &str, model: &Ident) -> Result<Ident> {
    if syn::parse_str::<Ident>(name).is_ok() {
        return Ok(Ident::new(name, Span::call_site()));
    }

    match name {
        "crate" | "self" | "super" => Err(Error::new_spanned(
            model,
            format!("`{name}` cannot name the model's helper module"),
        )),
        _ => Ok(Ident::new_raw(name, Span::call_site())),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn keyword_models_get_raw_module_names() {
        let model = Ident::new("Match", Span::call_site());

        assert_eq!(module_ident("user_model", &model).unwrap().to_string(), "user_model");
        assert_eq!(module_ident("match", &model).unwrap().to_string(), "r#match");
        assert_eq!(module_ident("type", &model).unwrap().to_string(), "r#type");
        assert!(module_ident("crate", &model).is_err());
    }
}
