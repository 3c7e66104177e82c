//! The `define_element!` macro

/// Declare an element type and generate its typed accessors
///
/// Each member line pairs a property name with a descriptor:
///
/// - `name: OptionalAttribute("attr", SimpleType)`, optionally followed by
///   `default = expr`
/// - `name: RequiredAttribute("attr", SimpleType)`
/// - `name: ZeroOrOne("p:tag", successors = ["p:next", ...])`
/// - `name: ZeroOrMore("p:tag", successors = [...])`
///
/// The macro emits a unit struct holding the descriptors as associated
/// constants, an accessor trait implemented for [`Element`], and the
/// [`ElementType`] impl whose class is built on first use. Methods given in
/// an `overrides` block replace the generated ones and are recorded as
/// explicit members of the class.
///
/// ```
/// use oxml::define_element;
/// use oxml::simple_types::XsdBoolean;
///
/// define_element! {
///     /// `<p:example>`, an invented element
///     pub struct CtExample: CtExampleExt = ("CT_Example", "p:example") {
///         hidden: OptionalAttribute("hidden", XsdBoolean, default = false),
///         item: ZeroOrMore("p:item", successors = []),
///     }
/// }
/// ```
///
/// [`Element`]: crate::documents::Element
/// [`ElementType`]: crate::xmlchemy::ElementType
#[macro_export]
macro_rules! define_element {
    (
        $(#[$meta:meta])*
        $vis:vis struct $name:ident : $ext:ident = ($class_name:literal, $nsptag:literal) {
            $( $member:ident : $kind:ident ( $($args:tt)* ) ),* $(,)?
        }
        $(
            overrides {
                $(
                    $(#[$ometa:meta])*
                    fn $oname:ident ( $($oargs:tt)* ) $(-> $oret:ty)? $obody:block
                )*
            }
        )?
    ) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, Default)]
        $vis struct $name;

        impl $name {
            $( $crate::__element_member! { @const $member $kind ($($args)*) } )*
        }

        $( $crate::__element_member! { @names $member $kind } )*

        #[doc = concat!("Accessors of `", $class_name, "`, the `<", $nsptag, ">` element.")]
        $vis trait $ext:
            ::core::convert::AsRef<$crate::documents::Element>
            + ::core::convert::AsMut<$crate::documents::Element>
        {
            $( $crate::__element_member! { @methods $name $member $kind ($($args)*) } )*
        }

        impl $ext for $crate::documents::Element {
            $($(
                $(#[$ometa])*
                fn $oname ( $($oargs)* ) $(-> $oret)? $obody
            )*)?
        }

        impl $crate::xmlchemy::ElementType for $name {
            const NSPTAG: &'static str = $nsptag;

            fn class() -> &'static $crate::xmlchemy::ElementClass {
                static CLASS: $crate::__private::once_cell::sync::Lazy<
                    $crate::xmlchemy::ElementClass,
                > = $crate::__private::once_cell::sync::Lazy::new(|| {
                    $crate::xmlchemy::ElementClass::build(
                        $class_name,
                        $nsptag,
                        ::std::vec![
                            $( (
                                stringify!($member),
                                $crate::__element_member!(@descriptor $name $member),
                            ), )*
                        ],
                        &[ $($( stringify!($oname), )*)? ],
                    )
                });
                &CLASS
            }
        }
    };
}

#[doc(hidden)]
#[macro_export]
macro_rules! __element_member {
    // -------------------------------------------------------------------------
    // Descriptor constants
    // -------------------------------------------------------------------------
    (@const $member:ident OptionalAttribute ($attr:literal, $st:ty, default = $default:expr)) => {
        $crate::__private::paste::paste! {
            #[doc = concat!("Descriptor of the `", $attr, "` attribute")]
            pub const [<$member:upper>]: $crate::xmlchemy::OptionalAttribute<$st> =
                $crate::xmlchemy::OptionalAttribute::with_default($attr, $default);
        }
    };
    (@const $member:ident OptionalAttribute ($attr:literal, $st:ty)) => {
        $crate::__private::paste::paste! {
            #[doc = concat!("Descriptor of the `", $attr, "` attribute")]
            pub const [<$member:upper>]: $crate::xmlchemy::OptionalAttribute<$st> =
                $crate::xmlchemy::OptionalAttribute::new($attr);
        }
    };
    (@const $member:ident RequiredAttribute ($attr:literal, $st:ty)) => {
        $crate::__private::paste::paste! {
            #[doc = concat!("Descriptor of the `", $attr, "` attribute")]
            pub const [<$member:upper>]: $crate::xmlchemy::RequiredAttribute<$st> =
                $crate::xmlchemy::RequiredAttribute::new($attr);
        }
    };
    (@const $member:ident ZeroOrOne ($tag:literal, successors = [$($succ:literal),* $(,)?])) => {
        $crate::__private::paste::paste! {
            #[doc = concat!("Descriptor of the `<", $tag, ">` child")]
            pub const [<$member:upper>]: $crate::xmlchemy::ZeroOrOne =
                $crate::xmlchemy::ZeroOrOne::new($tag, &[$($succ),*]);
        }
    };
    (@const $member:ident ZeroOrMore ($tag:literal, successors = [$($succ:literal),* $(,)?])) => {
        $crate::__private::paste::paste! {
            #[doc = concat!("Descriptor of the `<", $tag, ">` children")]
            pub const [<$member:upper>]: $crate::xmlchemy::ZeroOrMore =
                $crate::xmlchemy::ZeroOrMore::new($tag, &[$($succ),*]);
        }
    };

    // -------------------------------------------------------------------------
    // Accessor names must not be shadowed by inherent Element methods
    // -------------------------------------------------------------------------
    (@names $member:ident OptionalAttribute) => {
        const _: () = $crate::__private::assert_accessor_names(stringify!($member), &["", "set_"], &[]);
    };
    (@names $member:ident RequiredAttribute) => {
        const _: () = $crate::__private::assert_accessor_names(stringify!($member), &["", "set_"], &[]);
    };
    (@names $member:ident ZeroOrOne) => {
        const _: () = $crate::__private::assert_accessor_names(
            stringify!($member),
            &["", "new_", "insert_", "add_", "get_or_add_", "remove_"],
            &["_mut"],
        );
    };
    (@names $member:ident ZeroOrMore) => {
        const _: () = $crate::__private::assert_accessor_names(
            stringify!($member),
            &["new_", "insert_", "add_"],
            &["_lst", "_lst_mut"],
        );
    };

    (@descriptor $owner:ident $member:ident) => {
        $crate::__private::paste::paste! {
            $crate::xmlchemy::Descriptor::from($owner::[<$member:upper>])
        }
    };

    // -------------------------------------------------------------------------
    // Accessor methods
    // -------------------------------------------------------------------------
    (@check $owner:ident $elm:expr) => {
        <$owner as $crate::xmlchemy::ElementType>::check_instance($elm)?
    };

    (@methods $owner:ident $member:ident OptionalAttribute ($attr:literal, $st:ty, default = $default:expr)) => {
        $crate::__private::paste::paste! {
            #[doc = concat!(
                stringify!($st), " type-converted value of ``", $attr, "`` attribute, or the ",
                "default value if not present."
            )]
            fn $member(&self) -> $crate::error::Result<<$st as $crate::simple_types::SimpleType>::Value> {
                $crate::__element_member!(@check $owner self.as_ref());
                $owner::[<$member:upper>]
                    .get(self.as_ref())
                    .map(|value| value.unwrap_or_else(|| $default))
            }

            #[doc = concat!(
                "Assign the ``", $attr, "`` attribute. Assigning the default value or `None` ",
                "removes the attribute from the element."
            )]
            fn [<set_ $member>](
                &mut self,
                value: impl ::core::convert::Into<
                    ::core::option::Option<<$st as $crate::simple_types::SimpleType>::Value>,
                >,
            ) -> $crate::error::Result<()> {
                $crate::__element_member!(@check $owner self.as_ref());
                $owner::[<$member:upper>].set(self.as_mut(), value)
            }
        }
    };
    (@methods $owner:ident $member:ident OptionalAttribute ($attr:literal, $st:ty)) => {
        $crate::__private::paste::paste! {
            #[doc = concat!(
                stringify!($st), " type-converted value of ``", $attr, "`` attribute, or `None` ",
                "if not present."
            )]
            fn $member(
                &self,
            ) -> $crate::error::Result<
                ::core::option::Option<<$st as $crate::simple_types::SimpleType>::Value>,
            > {
                $crate::__element_member!(@check $owner self.as_ref());
                $owner::[<$member:upper>].get(self.as_ref())
            }

            #[doc = concat!(
                "Assign the ``", $attr, "`` attribute; `None` removes it from the element."
            )]
            fn [<set_ $member>](
                &mut self,
                value: impl ::core::convert::Into<
                    ::core::option::Option<<$st as $crate::simple_types::SimpleType>::Value>,
                >,
            ) -> $crate::error::Result<()> {
                $crate::__element_member!(@check $owner self.as_ref());
                $owner::[<$member:upper>].set(self.as_mut(), value)
            }
        }
    };
    (@methods $owner:ident $member:ident RequiredAttribute ($attr:literal, $st:ty)) => {
        $crate::__private::paste::paste! {
            #[doc = concat!(stringify!($st), " type-converted value of ``", $attr, "`` attribute.")]
            fn $member(&self) -> $crate::error::Result<<$st as $crate::simple_types::SimpleType>::Value> {
                $crate::__element_member!(@check $owner self.as_ref());
                $owner::[<$member:upper>].get(self.as_ref())
            }

            #[doc = concat!("Validate and assign the ``", $attr, "`` attribute.")]
            fn [<set_ $member>](
                &mut self,
                value: <$st as $crate::simple_types::SimpleType>::Value,
            ) -> $crate::error::Result<()> {
                $crate::__element_member!(@check $owner self.as_ref());
                $owner::[<$member:upper>].set(self.as_mut(), value)
            }
        }
    };
    (@methods $owner:ident $member:ident ZeroOrOne ($tag:literal, successors = [$($succ:literal),* $(,)?])) => {
        $crate::__element_member! { @child_methods $owner $member $tag }

        $crate::__private::paste::paste! {
            #[doc = concat!("``<", $tag, ">`` child element or |None| if not present.")]
            fn $member(
                &self,
            ) -> $crate::error::Result<::core::option::Option<&$crate::documents::Element>> {
                $crate::__element_member!(@check $owner self.as_ref());
                ::core::result::Result::Ok($owner::[<$member:upper>].get(self.as_ref()))
            }

            #[doc = concat!("``<", $tag, ">`` child element, mutably.")]
            fn [<$member _mut>](
                &mut self,
            ) -> $crate::error::Result<::core::option::Option<&mut $crate::documents::Element>> {
                $crate::__element_member!(@check $owner self.as_ref());
                ::core::result::Result::Ok($owner::[<$member:upper>].get_mut(self.as_mut()))
            }

            #[doc = concat!("Return the ``<", $tag, ">`` child element, newly added if not present.")]
            fn [<get_or_add_ $member>](
                &mut self,
            ) -> $crate::error::Result<&mut $crate::documents::Element> {
                if self.$member()?.is_none() {
                    return self.[<add_ $member>]();
                }
                $owner::[<$member:upper>].get_or_add(self.as_mut())
            }

            #[doc = concat!("Remove all ``<", $tag, ">`` child elements.")]
            fn [<remove_ $member>](&mut self) -> $crate::error::Result<()> {
                $crate::__element_member!(@check $owner self.as_ref());
                $owner::[<$member:upper>].remove(self.as_mut());
                ::core::result::Result::Ok(())
            }
        }
    };
    (@methods $owner:ident $member:ident ZeroOrMore ($tag:literal, successors = [$($succ:literal),* $(,)?])) => {
        $crate::__element_member! { @child_methods $owner $member $tag }

        $crate::__private::paste::paste! {
            #[doc = concat!(
                "A list containing each of the ``<", $tag, ">`` child elements, in the order ",
                "they appear."
            )]
            fn [<$member _lst>](
                &self,
            ) -> $crate::error::Result<::std::vec::Vec<&$crate::documents::Element>> {
                $crate::__element_member!(@check $owner self.as_ref());
                ::core::result::Result::Ok($owner::[<$member:upper>].list(self.as_ref()))
            }

            #[doc = concat!("Each of the ``<", $tag, ">`` child elements, mutably.")]
            fn [<$member _lst_mut>](
                &mut self,
            ) -> $crate::error::Result<::std::vec::Vec<&mut $crate::documents::Element>> {
                $crate::__element_member!(@check $owner self.as_ref());
                ::core::result::Result::Ok($owner::[<$member:upper>].list_mut(self.as_mut()))
            }
        }
    };

    (@child_methods $owner:ident $member:ident $tag:literal) => {
        $crate::__private::paste::paste! {
            #[doc = concat!(
                "Return a \"loose\", newly created ``<", $tag, ">`` element having no ",
                "attributes, text, or children."
            )]
            fn [<new_ $member>](&self) -> $crate::error::Result<$crate::documents::Element> {
                $crate::__element_member!(@check $owner self.as_ref());
                $crate::xmlchemy::ChildDescriptor::new_child(&$owner::[<$member:upper>])
            }

            #[doc = concat!(
                "Insert the passed ``<", $tag, ">`` element as a child in the correct sequence."
            )]
            fn [<insert_ $member>](
                &mut self,
                child: $crate::documents::Element,
            ) -> $crate::error::Result<&mut $crate::documents::Element> {
                $crate::__element_member!(@check $owner self.as_ref());
                ::core::result::Result::Ok($crate::xmlchemy::ChildDescriptor::insert(
                    &$owner::[<$member:upper>],
                    self.as_mut(),
                    child,
                ))
            }

            #[doc = concat!(
                "Add a new ``<", $tag, ">`` child element unconditionally, inserted in the ",
                "correct sequence."
            )]
            fn [<add_ $member>](&mut self) -> $crate::error::Result<&mut $crate::documents::Element> {
                self.[<add_ $member _with>](&[])
            }

            #[doc = concat!(
                "Add a new ``<", $tag, ">`` child element after assigning each property value ",
                "to it, inserted in the correct sequence."
            )]
            fn [<add_ $member _with>](
                &mut self,
                attrs: &[(&str, $crate::simple_types::XsdValue)],
            ) -> $crate::error::Result<&mut $crate::documents::Element> {
                $crate::__element_member!(@check $owner self.as_ref());
                let mut child = self.[<new_ $member>]()?;
                for (name, value) in attrs {
                    child.set_property(name, value)?;
                }
                self.[<insert_ $member>](child)
            }
        }
    };
}

/// Inherent [`Element`](crate::documents::Element) methods, which a
/// generated accessor of the same name could never be called over
const ELEMENT_METHODS: &[&str] = &[
    "tag", "local_name", "namespace", "is", "namespaces", "class", "get", "get_qname", "set",
    "set_qname", "remove_attribute", "has_attribute", "attributes", "text", "set_text",
    "clear_text", "tail", "set_tail", "children", "children_mut", "append", "insert", "remove",
    "find", "find_mut", "findall", "findall_mut", "position", "first_child_found_in",
    "first_index_found_in", "insert_element_before", "remove_all", "remove_if_present",
    "serialize", "xml", "write_to", "property", "get_property", "set_property", "is_instance",
];

const fn bytes_at(hay: &[u8], start: usize, needle: &[u8]) -> bool {
    if start + needle.len() > hay.len() {
        return false;
    }
    let mut i = 0;
    while i < needle.len() {
        if hay[start + i] != needle[i] {
            return false;
        }
        i += 1;
    }
    true
}

/// True when `name` is `prefix` + `member` + `suffix`
const fn spells(name: &[u8], prefix: &[u8], member: &[u8], suffix: &[u8]) -> bool {
    name.len() == prefix.len() + member.len() + suffix.len()
        && bytes_at(name, 0, prefix)
        && bytes_at(name, prefix.len(), member)
        && bytes_at(name, prefix.len() + member.len(), suffix)
}

/// Fail compilation when an accessor generated for `member` collides with
/// an inherent `Element` method
///
/// Each prefix is combined with the bare member name and each suffix is
/// appended to it; an empty prefix stands for the bare name itself.
#[doc(hidden)]
pub const fn assert_accessor_names(member: &str, prefixes: &[&str], suffixes: &[&str]) {
    let member = member.as_bytes();
    let mut m = 0;
    while m < ELEMENT_METHODS.len() {
        let name = ELEMENT_METHODS[m].as_bytes();
        let mut p = 0;
        while p < prefixes.len() {
            if spells(name, prefixes[p].as_bytes(), member, b"") {
                panic!("generated accessor is shadowed by an inherent Element method");
            }
            p += 1;
        }
        let mut s = 0;
        while s < suffixes.len() {
            if spells(name, b"", member, suffixes[s].as_bytes()) {
                panic!("generated accessor is shadowed by an inherent Element method");
            }
            s += 1;
        }
        m += 1;
    }
}
