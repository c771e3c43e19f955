/// Declare a record type together with its delta type and [`Record`] impl.
///
/// Members are grouped by kind, and each group is optional:
///
/// ```
/// use deltagen_core::{record, Root};
///
/// record! {
///     pub struct Item => ItemDelta {
///         scalars { name: String, count: u32 }
///     }
/// }
///
/// record! {
///     pub root struct Inventory => InventoryDelta {
///         scalars { owner: String }
///         records { featured: Item }
///         maps { items: u64 => Item }
///     }
/// }
///
/// let old = Inventory::default();
/// let mut new = old.clone();
/// new.items.insert(1, Item { name: "lamp".into(), count: 2 });
///
/// let delta = old.delta_to(&new).unwrap();
/// assert_eq!(old.apply(&delta), new);
/// assert!(new.delta_to(&new).is_none());
/// ```
///
/// The generated struct has public fields: scalars as declared, nested
/// records by value, and maps as [`RecordMap`](crate::RecordMap). The delta
/// struct mirrors it with `Option` slots and [`MapDelta`](crate::MapDelta)s.
/// `root` additionally implements [`Root`](crate::Root).
///
/// Both structs derive `serde::Serialize` and `serde::Deserialize`, so the
/// invoking crate must depend on `serde`.
///
/// [`Record`]: crate::Record
#[macro_export]
macro_rules! record {
    (
        $(#[$meta:meta])*
        $vis:vis root struct $name:ident => $delta:ident { $($body:tt)* }
    ) => {
        $crate::record! { @define true; $(#[$meta])* $vis $name $delta { $($body)* } }
        impl $crate::Root for $name {}
    };

    (
        $(#[$meta:meta])*
        $vis:vis struct $name:ident => $delta:ident { $($body:tt)* }
    ) => {
        $crate::record! { @define false; $(#[$meta])* $vis $name $delta { $($body)* } }
    };

    (
        @define $root:literal;
        $(#[$meta:meta])*
        $vis:vis $name:ident $delta:ident {
            $( scalars { $( $(#[$smeta:meta])* $sfield:ident : $sty:ty ),* $(,)? } )?
            $( records { $( $(#[$rmeta:meta])* $rfield:ident : $rty:ty ),* $(,)? } )?
            $( maps { $( $(#[$mmeta:meta])* $mfield:ident : $kty:ty => $mty:ty ),* $(,)? } )?
        }
    ) => {
        $(#[$meta])*
        #[derive(Clone, Debug, Default, PartialEq, ::serde::Serialize, ::serde::Deserialize)]
        #[serde(default)]
        $vis struct $name {
            $($( $(#[$smeta])* pub $sfield: $sty, )*)?
            $($( $(#[$rmeta])* pub $rfield: $rty, )*)?
            $($( $(#[$mmeta])* pub $mfield: $crate::RecordMap<$kty, $mty>, )*)?
        }

        #[doc = concat!("Changes to a [`", stringify!($name), "`].")]
        #[derive(Clone, Debug, Default, PartialEq, ::serde::Serialize, ::serde::Deserialize)]
        #[serde(default)]
        $vis struct $delta {
            $($(
                #[serde(skip_serializing_if = "Option::is_none")]
                pub $sfield: ::std::option::Option<$sty>,
            )*)?
            $($(
                #[serde(skip_serializing_if = "Option::is_none")]
                pub $rfield: ::std::option::Option<<$rty as $crate::Record>::Delta>,
            )*)?
            $($(
                pub $mfield: $crate::MapDelta<$kty, <$mty as $crate::Record>::Delta>,
            )*)?
        }

        impl $crate::Delta for $delta {
            fn is_empty(&self) -> bool {
                true
                $($( && self.$sfield.is_none() )*)?
                $($( && self.$rfield.as_ref().map_or(true, $crate::Delta::is_empty) )*)?
                $($( && self.$mfield.is_empty() )*)?
            }
        }

        impl $crate::Record for $name {
            type Delta = $delta;

            const NAME: &'static str = stringify!($name);

            #[allow(unused_variables)]
            fn diff(&self, new: &Self) -> ::std::option::Option<$delta> {
                let delta = $delta {
                    $($( $sfield: $crate::diff::diff_scalar(&self.$sfield, &new.$sfield), )*)?
                    $($( $rfield: $crate::diff::diff_record(&self.$rfield, &new.$rfield), )*)?
                    $($( $mfield: $crate::diff::diff_map(&self.$mfield, &new.$mfield), )*)?
                };
                $crate::non_empty(delta)
            }

            #[allow(unused_mut, unused_variables)]
            fn merge(mut self, delta: ::std::option::Option<&$delta>) -> (Self, bool) {
                let ::std::option::Option::Some(delta) = delta else {
                    return (self, false);
                };
                let mut changed = false;
                $($( changed |= $crate::merge::merge_scalar(&mut self.$sfield, delta.$sfield.as_ref()); )*)?
                $($( changed |= $crate::merge::merge_record(&mut self.$rfield, delta.$rfield.as_ref()); )*)?
                $($( changed |= $crate::merge::merge_map(&mut self.$mfield, &delta.$mfield); )*)?
                (self, changed)
            }

            fn copy(&self) -> Self {
                Self {
                    $($( $sfield: ::std::clone::Clone::clone(&self.$sfield), )*)?
                    $($( $rfield: $crate::Record::copy(&self.$rfield), )*)?
                    $($( $mfield: $crate::copy::copy_map(&self.$mfield), )*)?
                }
            }

            fn declaration() -> $crate::schema::RecordDecl {
                let mut decl = $crate::schema::RecordDecl::new(stringify!($name))
                    $($( .scalar(
                        stringify!($sfield),
                        $crate::schema::ScalarType::from_rust_type(stringify!($sty)),
                    ) )*)?
                    $($( .record(stringify!($rfield), <$rty as $crate::Record>::NAME) )*)?
                    $($( .map(
                        stringify!($mfield),
                        $crate::schema::ScalarType::from_rust_type(stringify!($kty)),
                        <$mty as $crate::Record>::NAME,
                    ) )*)?;
                decl.root = $root;
                decl
            }

            fn collect_declarations(out: &mut ::std::vec::Vec<$crate::schema::RecordDecl>) {
                if out.iter().any(|d| d.name == <Self as $crate::Record>::NAME) {
                    return;
                }
                out.push(<Self as $crate::Record>::declaration());
                $($( <$rty as $crate::Record>::collect_declarations(out); )*)?
                $($( <$mty as $crate::Record>::collect_declarations(out); )*)?
            }
        }
    };
}
