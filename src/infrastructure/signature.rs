use base64::Engine;
use hmac::{Hmac, Mac};
use sha2::Sha256;
use subtle::ConstantTimeEq;

type HmacSha256 = Hmac<Sha256>;

fn hmac_base64(secret: &str, data: &str) -> String {
    // HMAC 接受任意长度的密钥（超长密钥先做哈希），new_from_slice 不会返回错误
    let mut mac =
        HmacSha256::new_from_slice(secret.as_bytes()).expect("HMAC can take key of any size");
    mac.update(data.as_bytes());
    base64::engine::general_purpose::STANDARD.encode(mac.finalize().into_bytes())
}

/// 生成 `X-LINE-Authorization` 签名
///
/// 签名串按 `secret + path + query + body + nonce` 顺序拼接，顺序由 LINE Pay 规定，
/// 然后以 `secret` 为密钥计算 HMAC-SHA256 并做 Base64 编码。
/// `query` 不带前导 `?`，没有参数时为空串。
pub fn sign(secret: &str, path: &str, body: &str, nonce: &str, query: &str) -> String {
    let message = format!("{}{}{}{}{}", secret, path, query, body, nonce);
    hmac_base64(secret, &message)
}

/// 验证签名（用于接收带签名的回调）
///
/// 比较耗时只取决于较长输入的长度，长度不同也会完整比较一遍。
pub fn verify_signature(secret: &str, data: &str, signature: &str) -> bool {
    let expected = hmac_base64(secret, data);
    constant_time_eq(expected.as_bytes(), signature.as_bytes())
}

fn constant_time_eq(a: &[u8], b: &[u8]) -> bool {
    let len = a.len().max(b.len());

    let mut padded_a = vec![0u8; len];
    padded_a[..a.len()].copy_from_slice(a);
    let mut padded_b = vec![0u8; len];
    padded_b[..b.len()].copy_from_slice(b);

    let same_len = (a.len() as u64).ct_eq(&(b.len() as u64));
    let same_bytes = padded_a.ct_eq(&padded_b);

    (same_len & same_bytes).into()
}
