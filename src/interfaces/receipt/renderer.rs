use crate::domain::receipt::Receipt;
use std::fmt::Write as _;
use std::io;

/// Placeholders for absent customer fields; a missing field never fails a
/// render.
const PLACEHOLDER_NAME: &str = "Customer";
const PLACEHOLDER_EMAIL: &str = "customer@hotel.com";
const PLACEHOLDER_PHONE: &str = "N/A";

/// Renders the receipt as a self-contained HTML document for download.
///
/// Pure function of the receipt: rendering the same receipt twice yields
/// byte-identical output.
pub fn render_for_download(receipt: &Receipt) -> String {
    render(receipt, false)
}

/// Same document as the download rendition, plus an on-load print trigger.
pub fn render_for_print(receipt: &Receipt) -> String {
    render(receipt, true)
}

/// File name the download artifact should be saved under.
pub fn download_file_name(receipt: &Receipt) -> String {
    format!(
        "Hotel_Receipt_{}_{}.html",
        receipt.receipt_number,
        receipt.issued_at.format("%Y-%m-%d")
    )
}

/// Writes the download rendition of a receipt to any `io::Write` sink.
pub struct ReceiptWriter<W: io::Write> {
    writer: W,
}

impl<W: io::Write> ReceiptWriter<W> {
    pub fn new(writer: W) -> Self {
        Self { writer }
    }

    pub fn write_receipt(&mut self, receipt: &Receipt) -> io::Result<()> {
        self.writer.write_all(render_for_download(receipt).as_bytes())?;
        self.writer.flush()
    }
}

fn render(receipt: &Receipt, auto_print: bool) -> String {
    let customer = &receipt.customer;
    let name = match (&customer.first_name, &customer.last_name) {
        (None, None) => PLACEHOLDER_NAME.to_string(),
        (first, last) => format!(
            "{} {}",
            first.as_deref().unwrap_or(""),
            last.as_deref().unwrap_or("")
        )
        .trim()
        .to_string(),
    };
    let email = customer.email.as_deref().unwrap_or(PLACEHOLDER_EMAIL);
    let phone = customer.phone.as_deref().unwrap_or(PLACEHOLDER_PHONE);
    let status = format!("{:?}", receipt.booking_status);

    let mut html = String::new();
    // Infallible: fmt::Write on String never errors.
    let _ = write!(
        html,
        r#"<!DOCTYPE html>
<html>
<head>
<meta charset="utf-8">
<title>Hotel Booking Receipt</title>
<style>
body {{ font-family: 'Segoe UI', Tahoma, Geneva, Verdana, sans-serif; margin: 0; padding: 20px; background: #f5f5f5; color: #333; }}
.receipt {{ max-width: 600px; margin: 0 auto; background: white; border-radius: 12px; overflow: hidden; }}
.header {{ background: #667eea; color: white; padding: 30px; text-align: center; }}
.body {{ padding: 30px; }}
.section h3 {{ color: #667eea; border-bottom: 2px solid #f0f0f0; padding-bottom: 8px; }}
.row {{ display: flex; justify-content: space-between; padding: 8px 0; border-bottom: 1px solid #f8f8f8; }}
.label {{ color: #666; }}
.value {{ font-weight: 600; }}
.total {{ font-size: 24px; font-weight: bold; color: #2d5a27; text-align: center; margin: 20px 0; padding: 15px; background: #e8f5e8; border-radius: 8px; }}
.footer {{ background: #f8f9fa; padding: 20px 30px; text-align: center; color: #666; font-size: 14px; }}
@media print {{ body {{ background: white; }} }}
</style>
</head>
<body>
<div class="receipt">
<div class="header"><h1>Hotel Management System</h1><p>Booking &amp; Payment Receipt</p></div>
<div class="body">
<h2>Receipt #{receipt_number}</h2>
<p>{issued_at}</p>
<div class="section">
<h3>Booking Details</h3>
<div class="row"><span class="label">Room Number:</span><span class="value">Room {room_id}</span></div>
<div class="row"><span class="label">Check-in Date:</span><span class="value">{check_in}</span></div>
<div class="row"><span class="label">Check-out Date:</span><span class="value">{check_out}</span></div>
<div class="row"><span class="label">Guests:</span><span class="value">{guests} Guest(s)</span></div>
<div class="row"><span class="label">Status:</span><span class="value">{status}</span></div>
</div>
<div class="section">
<h3>Customer Details</h3>
<div class="row"><span class="label">Name:</span><span class="value">{name}</span></div>
<div class="row"><span class="label">Email:</span><span class="value">{email}</span></div>
<div class="row"><span class="label">Phone:</span><span class="value">{phone}</span></div>
<div class="row"><span class="label">Customer ID:</span><span class="value">{customer_id}</span></div>
</div>
<div class="section">
<h3>Payment Information</h3>
<div class="row"><span class="label">Payment ID:</span><span class="value">{payment_id}</span></div>
<div class="row"><span class="label">Order ID:</span><span class="value">{order_id}</span></div>
<div class="row"><span class="label">Payment Method:</span><span class="value">Card Payment (simulated)</span></div>
<div class="row"><span class="label">Transaction Status:</span><span class="value">Paid</span></div>
</div>
<div class="total">Total Amount Paid: &#8377;{amount}</div>
"#,
        receipt_number = escape(&receipt.receipt_number),
        issued_at = receipt.issued_at.format("%d %B %Y, %H:%M UTC"),
        room_id = escape(&receipt.room_id),
        check_in = receipt.check_in.format("%d/%m/%Y"),
        check_out = receipt.check_out.format("%d/%m/%Y"),
        guests = receipt.guests,
        status = status,
        name = escape(&name),
        email = escape(email),
        phone = escape(phone),
        customer_id = customer.user_id,
        payment_id = escape(&receipt.payment_id),
        order_id = escape(&receipt.order_id),
        amount = receipt.display_amount(),
    );

    if let Some(requests) = &receipt.special_requests {
        let _ = write!(
            html,
            "<div class=\"section\"><h3>Special Requests</h3><p>{}</p></div>\n",
            escape(requests)
        );
    }

    let _ = write!(
        html,
        r#"</div>
<div class="footer">
<p><strong>Thank you for choosing Hotel Management System!</strong></p>
<p>This is a computer-generated receipt and does not require a signature.</p>
<p>Receipt #{receipt_number}</p>
</div>
</div>
"#,
        receipt_number = escape(&receipt.receipt_number),
    );

    if auto_print {
        html.push_str("<script>window.onload = function () { window.print(); };</script>\n");
    }
    html.push_str("</body>\n</html>\n");
    html
}

fn escape(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            _ => escaped.push(c),
        }
    }
    escaped
}
