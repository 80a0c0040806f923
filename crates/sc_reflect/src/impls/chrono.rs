use crate::impls::opaque::impl_reflect_opaque;

impl_reflect_opaque!(::chrono::DateTime<::chrono::Utc> => "chrono"::"DateTime<Utc>" [
    TypeTraitDefault, TypeTraitSerialize, TypeTraitDeserialize
]);

#[cfg(test)]
mod tests {
    use chrono::{DateTime, Utc};

    use crate::info::{TypeIdentity, TypePath};

    #[test]
    fn datetime_identity() {
        assert_eq!(<DateTime<Utc>>::type_path(), "chrono::DateTime<Utc>");
        assert_eq!(
            TypeIdentity::of::<DateTime<Utc>>(),
            TypeIdentity::new_static("chrono", "DateTime<Utc>")
        );
    }
}
