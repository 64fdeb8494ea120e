use proc_macro2::TokenStream;

pub fn combine_token_streams<I: IntoIterator<Item = TokenStream>>(streams: I) -> TokenStream {
    streams
        .into_iter()
        .reduce(|mut l, r| {
            l.extend(r);
            l
        })
        .unwrap_or_default()
}
