use crate::prelude::*;
use proc_macro_crate::{FoundCrate, crate_name};

macro_rules! extract {
    ($val:expr, $pat:pat, $error_message: expr) => {
        let $pat = $val else {
            return Err(Error::new_spanned($val, $error_message));
        };
    };
}

pub fn extract_named_fields(span: Span, data: Data) -> Result<FieldsNamed> {
    let Data::Struct(data_struct) = data else {
        return Err(Error::new(span, "expected struct"));
    };

    extract!(
        data_struct.fields,
        Fields::Named(named_fields),
        "expected named fields"
    );

    Ok(named_fields)
}

/// `rename = "..."` or `rename(serialize = "...", deserialize = "...")`. Only the serialized
/// name reaches the database.
#[derive(Default)]
struct SerializedName(Option<String>);

#[derive(FromMeta)]
#[darling(allow_unknown_fields)]
struct SerializedNamePair {
    #[darling(default)]
    serialize: Option<String>,
}

impl FromMeta for SerializedName {
    fn from_string(value: &str) -> darling::Result<Self> {
        Ok(Self(Some(value.to_owned())))
    }

    fn from_list(items: &[NestedMeta]) -> darling::Result<Self> {
        SerializedNamePair::from_list(items).map(|pair| Self(pair.serialize))
    }
}

#[derive(FromAttributes)]
#[darling(attributes(serde), allow_unknown_fields)]
struct SerdeContainerAttribute {
    #[darling(default)]
    rename_all: SerializedName,
}

#[derive(FromAttributes)]
#[darling(attributes(serde), allow_unknown_fields)]
struct SerdeFieldAttribute {
    #[darling(default)]
    rename: SerializedName,
    #[darling(default)]
    skip: bool,
}

/// A container-level `#[serde(rename_all = "...")]` rule.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum RenameRule {
    Lower,
    Upper,
    Pascal,
    Camel,
    Snake,
    ScreamingSnake,
    Kebab,
    ScreamingKebab,
}

impl RenameRule {
    fn from_name(name: &str) -> darling::Result<Self> {
        let rule = match name {
            "lowercase" => Self::Lower,
            "UPPERCASE" => Self::Upper,
            "PascalCase" => Self::Pascal,
            "camelCase" => Self::Camel,
            "snake_case" => Self::Snake,
            "SCREAMING_SNAKE_CASE" => Self::ScreamingSnake,
            "kebab-case" => Self::Kebab,
            "SCREAMING-KEBAB-CASE" => Self::ScreamingKebab,
            _ => return Err(darling::Error::unknown_value(name)),
        };

        Ok(rule)
    }

    /// Renames a snake_case field the way serde does.
    pub fn apply(self, field: &str) -> String {
        match self {
            Self::Lower | Self::Snake => field.to_owned(),
            Self::Upper | Self::ScreamingSnake => field.to_ascii_uppercase(),
            Self::Pascal => field.to_upper_camel_case(),
            Self::Camel => field.to_lower_camel_case(),
            Self::Kebab => field.replace('_', "-"),
            Self::ScreamingKebab => field.to_ascii_uppercase().replace('_', "-"),
        }
    }
}

/// Reads `rename_all` from the container's serde attributes.
pub fn rename_rule(attrs: &[Attribute]) -> darling::Result<Option<RenameRule>> {
    let container = SerdeContainerAttribute::from_attributes(attrs)?;

    container
        .rename_all
        .0
        .as_deref()
        .map(RenameRule::from_name)
        .transpose()
}

/// The BSON key of a field: its `#[serde(rename)]` if any, otherwise its identifier with the
/// container's `rename_all` rule applied. `None` for `#[serde(skip)]` fields.
pub fn document_key(field: &Field, rule: Option<RenameRule>) -> darling::Result<Option<String>> {
    let serde_attribute = SerdeFieldAttribute::from_attributes(&field.attrs)?;

    if serde_attribute.skip {
        return Ok(None);
    }

    if let Some(rename) = serde_attribute.rename.0 {
        return Ok(Some(rename));
    }

    let ident = field.ident.as_ref().map(ToString::to_string).unwrap_or_default();
    let ident = ident.strip_prefix("r#").unwrap_or(&ident);

    Ok(Some(match rule {
        Some(rule) => rule.apply(ident),
        None => ident.to_owned(),
    }))
}

pub fn build_fields_enum<'a>(
    field_idents: impl Iterator<Item = &'a Ident>,
    field_lits: impl Iterator<Item = &'a LitStr>,
) -> TokenStream {
    let variants = field_idents
        .map(|ident| {
            let name = ident.to_string();
            let name = name.strip_prefix("r#").unwrap_or(&name);
            Ident::new(&name.to_upper_camel_case(), Span::call_site())
        })
        .collect_vec();

    quote! {
        #[derive(::std::fmt::Debug, ::std::clone::Clone, ::std::marker::Copy, ::std::cmp::PartialEq, ::std::cmp::Eq, ::std::hash::Hash)]
        pub enum Fields {
            #( #variants ),*
        }

        impl Fields {
            pub fn as_str(&self) -> &'static str {
                match *self {
                    #(
                        Self::#variants => #field_lits
                    ),*
                }
            }
        }

        impl ::std::fmt::Display for Fields {
            fn fmt(&self, f: &mut ::std::fmt::Formatter<'_>) -> ::std::fmt::Result {
                ::std::fmt::Formatter::write_str(f, self.as_str())
            }
        }

        impl ::std::convert::From<Fields> for ::std::string::String {
            fn from(value: Fields) -> Self {
                ::std::borrow::ToOwned::to_owned(value.as_str())
            }
        }
    }
}

pub fn krate() -> TokenStream {
    match crate_name("morn") {
        Ok(FoundCrate::Name(name)) => {
            let name = Ident::new(&name, Span::call_site());
            quote! { ::#name }
        }
        // the crate itself resolves through `extern crate self as morn`
        Ok(FoundCrate::Itself) | Err(_) => quote! { ::morn },
    }
}
